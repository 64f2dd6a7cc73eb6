use ipc_marshal::data_url::DataUrl;
use ipc_marshal::descriptor::{BUFFER, DATA_URL, REPRESENTATIONS, SCALE_FACTOR, SIZE, TAG};
use ipc_marshal::{
    deserialize, serialize, BinaryView, Bitmap, BitmapError, Boxed, BufferRepresentation,
    DataUrlRepresentation, DescriptorError, Deserializer, EmptyDescriptorPolicy, ErrorValue,
    ImageResource, ImageSink, ImageSource, Instance, MarshalError, MarshalOptions, RegExpValue,
    Serializer, Size, Value, ViewKind,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Origin {
    Native,
    Buffer,
    DataUrl,
}

#[derive(Debug, Clone, PartialEq)]
struct Rep {
    scale_factor: f64,
    size: Size,
    pixels: Vec<u8>,
    origin: Origin,
}

/// Image double that records how each representation was added.
#[derive(Debug, Clone, Default, PartialEq)]
struct RecordingImage {
    reps: Vec<Rep>,
    fail_encode: bool,
}

#[derive(Debug, thiserror::Error)]
enum RecordingError {
    #[error("encode failed at scale factor {0}")]
    Encode(f64),
    #[error("bad data URL")]
    DataUrl,
}

impl RecordingImage {
    fn with(mut self, scale_factor: f64, width: u32, height: u32) -> Self {
        let fill = self.reps.len() as u8 + 1;
        self.reps.push(Rep {
            scale_factor,
            size: Size::new(width, height),
            pixels: vec![fill; (width * height * 4) as usize],
            origin: Origin::Native,
        });
        self
    }

    fn rep(&self, scale_factor: f64) -> Option<&Rep> {
        self.reps.iter().find(|r| r.scale_factor == scale_factor)
    }

    fn origins(&self) -> Vec<Origin> {
        self.reps.iter().map(|r| r.origin).collect()
    }
}

impl ImageResource for RecordingImage {
    type Error = RecordingError;
}

impl ImageSource for RecordingImage {
    fn scale_factors(&self) -> Vec<f64> {
        self.reps.iter().map(|r| r.scale_factor).collect()
    }

    fn pixel_size(&self, scale_factor: f64) -> Size {
        self.rep(scale_factor).map(|r| r.size).unwrap_or_default()
    }

    fn to_data_url(&self, scale_factor: f64) -> Result<String, RecordingError> {
        if self.fail_encode {
            return Err(RecordingError::Encode(scale_factor));
        }
        let rep = self.rep(scale_factor).ok_or(RecordingError::Encode(scale_factor))?;
        Ok(DataUrl::new("image/x-test", rep.pixels.clone()).to_string())
    }

    fn to_bitmap(&self, scale_factor: f64) -> Result<Vec<u8>, RecordingError> {
        let rep = self.rep(scale_factor).ok_or(RecordingError::Encode(scale_factor))?;
        Ok(rep.pixels.clone())
    }
}

impl ImageSink for RecordingImage {
    fn create_empty() -> Self {
        Self::default()
    }

    fn add_representation_from_buffer(
        &mut self,
        representation: BufferRepresentation,
    ) -> Result<(), RecordingError> {
        self.reps.push(Rep {
            scale_factor: representation.scale_factor,
            size: Size::new(representation.width, representation.height),
            pixels: representation.buffer,
            origin: Origin::Buffer,
        });
        Ok(())
    }

    fn add_representation_from_data_url(
        &mut self,
        representation: DataUrlRepresentation,
    ) -> Result<(), RecordingError> {
        let url = DataUrl::parse(&representation.data_url).map_err(|_| RecordingError::DataUrl)?;
        self.reps.push(Rep {
            scale_factor: representation.scale_factor,
            size: Size::new(representation.width, representation.height),
            pixels: url.data,
            origin: Origin::DataUrl,
        });
        Ok(())
    }
}

type V = Value<RecordingImage>;

fn unit_size() -> V {
    V::object([("width", V::Number(1.0)), ("height", V::Number(1.0))])
}

fn safe_values() -> Vec<V> {
    vec![
        V::Null,
        V::View(BinaryView::uint8(vec![1, 2, 3])),
        V::View(BinaryView::new(ViewKind::Float32, vec![0; 8])),
        V::Boxed(Boxed::Bool(false)),
        V::Boxed(Boxed::Number(2.5)),
        V::Boxed(Boxed::Str("wrapped".into())),
        V::Date(1_700_000_000_000.0),
        V::Error(ErrorValue::new("RangeError", "out of range").with_stack("at f (x.js:1:1)")),
        V::RegExp(RegExpValue::new("^a.*z$", "gi")),
        V::ArrayBuffer(vec![9, 8, 7]),
    ]
}

#[test]
fn safe_values_pass_through_both_ways() {
    for value in safe_values() {
        let serialized = serialize(value.clone()).unwrap();
        assert_eq!(serialized, value);
        let deserialized = deserialize(value.clone()).unwrap();
        assert_eq!(deserialized, value);
    }
}

#[test]
fn safe_values_are_moved_not_copied() {
    let bytes = vec![5u8; 64];
    let ptr = bytes.as_ptr();
    let out = serialize(V::ArrayBuffer(bytes)).unwrap();
    let Value::ArrayBuffer(bytes) = out else {
        panic!("expected array buffer");
    };
    assert_eq!(bytes.as_ptr(), ptr);

    let out = deserialize(V::ArrayBuffer(bytes)).unwrap();
    let Value::ArrayBuffer(bytes) = out else {
        panic!("expected array buffer");
    };
    assert_eq!(bytes.as_ptr(), ptr);
}

#[test]
fn nullish_and_primitives_pass_through() {
    for value in [
        V::Null,
        V::Undefined,
        V::Bool(true),
        V::Number(-0.5),
        V::BigInt(1 << 70),
        V::str("plain"),
    ] {
        assert_eq!(serialize(value.clone()).unwrap(), value);
        assert_eq!(deserialize(value.clone()).unwrap(), value);
    }
}

#[test]
fn composite_order_is_preserved() {
    let value = V::object([
        ("z", V::Array(vec![V::str("a"), V::str("b"), V::str("c")])),
        ("a", V::Number(1.0)),
        ("m", V::object([("y", V::Null), ("x", V::Undefined)])),
    ]);
    let serialized = serialize(value.clone()).unwrap();
    assert_eq!(serialized, value);
    let keys: Vec<&str> = serialized
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["z", "a", "m"]);
    assert_eq!(deserialize(serialized).unwrap(), value);
}

#[test]
fn instances_degrade_to_plain_objects() {
    let point = V::Instance(
        Instance::new("Point")
            .with_member("x", V::Number(1.0))
            .with_member("y", V::Number(2.0))
            .with_member(
                "tag",
                V::Instance(Instance::new("Tag").with_member("n", V::str("t"))),
            ),
    );
    let expected = V::object([
        ("x", V::Number(1.0)),
        ("y", V::Number(2.0)),
        ("tag", V::object([("n", V::str("t"))])),
    ]);
    let serialized = serialize(point.clone()).unwrap();
    assert_eq!(serialized, expected);
    assert_eq!(deserialize(serialized).unwrap(), expected);
    assert_eq!(deserialize(point).unwrap(), expected);
}

#[test]
fn single_representation_uses_buffer_path() {
    let image = RecordingImage::default().with(1.0, 10, 10);
    let wire = serialize(V::Image(image.clone())).unwrap();
    assert!(!wire.contains_image());

    let back = deserialize(wire).unwrap().into_image().unwrap();
    assert_eq!(back.scale_factors(), vec![1.0]);
    assert_eq!(back.pixel_size(1.0), Size::new(10, 10));
    assert_eq!(back.origins(), vec![Origin::Buffer]);
    assert_eq!(back.reps[0].pixels, image.reps[0].pixels);
}

#[test]
fn multiple_representations_use_data_url_path() {
    let image = RecordingImage::default().with(1.0, 16, 16).with(2.0, 32, 32);
    let wire = serialize(V::Image(image.clone())).unwrap();

    let back = deserialize(wire).unwrap().into_image().unwrap();
    assert_eq!(back.scale_factors(), vec![1.0, 2.0]);
    assert_eq!(back.pixel_size(1.0), Size::new(16, 16));
    assert_eq!(back.pixel_size(2.0), Size::new(32, 32));
    assert_eq!(back.origins(), vec![Origin::DataUrl, Origin::DataUrl]);
    assert_eq!(back.reps[1].pixels, image.reps[1].pixels);
}

#[test]
fn descriptor_carries_both_encodings_in_native_order() {
    let image = RecordingImage::default().with(2.0, 2, 2).with(1.0, 1, 1);
    let wire = serialize(V::Image(image)).unwrap();
    let members = wire.as_object().unwrap();
    assert_eq!(members[TAG], V::Bool(true));
    let reps = members[REPRESENTATIONS].as_array().unwrap();
    assert_eq!(reps.len(), 2);

    let first = reps[0].as_object().unwrap();
    assert_eq!(first[SCALE_FACTOR], V::Number(2.0));
    assert_eq!(
        first[SIZE],
        V::object([("width", V::Number(2.0)), ("height", V::Number(2.0))])
    );
    assert!(matches!(
        &first[DATA_URL],
        Value::Str(s) if s.starts_with("data:image/x-test;base64,")
    ));
    assert!(matches!(
        &first[BUFFER],
        Value::View(v) if v.kind == ViewKind::Uint8 && v.bytes.len() == 16
    ));
    assert_eq!(reps[1].as_object().unwrap()[SCALE_FACTOR], V::Number(1.0));
}

#[test]
fn images_nested_in_composites() {
    let value = V::object([
        (
            "icons",
            V::Array(vec![
                V::Image(RecordingImage::default().with(1.0, 1, 1)),
                V::Image(RecordingImage::default().with(1.0, 2, 2).with(2.0, 4, 4)),
            ]),
        ),
        (
            "owner",
            V::Instance(Instance::new("Window").with_member(
                "icon",
                V::Image(RecordingImage::default().with(1.0, 3, 3)),
            )),
        ),
    ]);
    let wire = serialize(value).unwrap();
    assert!(!wire.contains_image());

    let back = deserialize(wire).unwrap();
    let members = back.as_object().unwrap();
    let icons = members["icons"].as_array().unwrap();
    assert_eq!(icons[0].as_image().unwrap().origins(), vec![Origin::Buffer]);
    assert_eq!(
        icons[1].as_image().unwrap().origins(),
        vec![Origin::DataUrl, Origin::DataUrl]
    );
    let owner = members["owner"].as_object().unwrap();
    assert_eq!(owner["icon"].as_image().unwrap().pixel_size(1.0), Size::new(3, 3));
}

#[test]
fn image_errors_surface_unchanged() {
    let image = RecordingImage {
        fail_encode: true,
        ..RecordingImage::default().with(1.5, 1, 1)
    };
    let err = serialize(V::Array(vec![V::Image(image)])).unwrap_err();
    assert!(matches!(
        err.into_image_error(),
        Some(RecordingError::Encode(sf)) if sf == 1.5
    ));
}

#[test]
fn data_url_failures_surface_from_deserialize() {
    let wire = V::object([
        (TAG, V::Bool(true)),
        (
            REPRESENTATIONS,
            V::Array(
                [1.0, 2.0]
                    .into_iter()
                    .map(|sf| {
                        V::object([
                            (SCALE_FACTOR, V::Number(sf)),
                            (SIZE, unit_size()),
                            (DATA_URL, V::str("not a data url")),
                            (BUFFER, V::View(BinaryView::uint8(vec![0; 4]))),
                        ])
                    })
                    .collect(),
            ),
        ),
    ]);
    let err = deserialize(wire).unwrap_err();
    assert!(matches!(err, MarshalError::Image(RecordingError::DataUrl)));
}

fn one_rep_descriptor<I>(tag: Value<I>, width: f64, height: f64) -> Value<I> {
    Value::object([
        (TAG, tag),
        (
            REPRESENTATIONS,
            Value::Array(vec![Value::object([
                (SCALE_FACTOR, Value::Number(1.0)),
                (
                    SIZE,
                    Value::object([
                        ("width", Value::Number(width)),
                        ("height", Value::Number(height)),
                    ]),
                ),
                (DATA_URL, Value::str("data:image/x-test;base64,AQIDBA==")),
                (BUFFER, Value::View(BinaryView::uint8(vec![1, 2, 3, 4]))),
            ])]),
        ),
    ])
}

#[test]
fn untagged_lookalikes_stay_objects() {
    let value = V::object([(TAG, V::Bool(false)), (REPRESENTATIONS, V::Array(vec![]))]);
    assert_eq!(deserialize(value.clone()).unwrap(), value);

    for tag in [
        V::Undefined,
        V::Null,
        V::Number(0.0),
        V::Number(-0.0),
        V::Number(f64::NAN),
        V::BigInt(0),
        V::str(""),
    ] {
        let value = one_rep_descriptor(tag, 1.0, 1.0);
        let back = deserialize(value.clone()).unwrap();
        assert!(!back.contains_image(), "{value:?}");
    }
}

#[test]
fn any_truthy_tag_marks_a_descriptor() {
    for tag in [
        V::Bool(true),
        V::Number(1.0),
        V::Number(-2.5),
        V::BigInt(7),
        V::str("yes"),
        V::Array(vec![]),
        V::Object(Default::default()),
        V::Boxed(Boxed::Bool(false)),
        V::Date(0.0),
    ] {
        let image = deserialize(one_rep_descriptor(tag, 1.0, 1.0))
            .unwrap()
            .into_image()
            .unwrap();
        assert_eq!(image.origins(), vec![Origin::Buffer]);
        assert_eq!(image.reps[0].pixels, vec![1, 2, 3, 4]);
    }
}

#[test]
fn oversized_descriptor_is_an_image_error_not_a_panic() {
    let max = f64::from(u32::MAX);
    let descriptor = one_rep_descriptor::<Bitmap>(Value::Bool(true), max, max);
    let err = deserialize(descriptor).unwrap_err();
    assert!(matches!(err, MarshalError::Image(BitmapError::TooLarge(_))));
}

#[test]
fn malformed_tagged_object_is_a_descriptor_error() {
    let value = V::object([(TAG, V::Bool(true))]);
    let err = deserialize(value).unwrap_err();
    assert!(matches!(
        err,
        MarshalError::Descriptor(DescriptorError::MissingField(REPRESENTATIONS))
    ));
}

#[test]
fn empty_descriptor_policies() {
    let empty = || V::object([(TAG, V::Bool(true)), (REPRESENTATIONS, V::Array(vec![]))]);

    let image = deserialize(empty()).unwrap().into_image().unwrap();
    assert!(image.scale_factors().is_empty());

    let strict = Deserializer::with_options(
        MarshalOptions::new().empty_descriptor(EmptyDescriptorPolicy::Reject),
    );
    let err = strict.deserialize(empty()).unwrap_err();
    assert!(matches!(err, MarshalError::Descriptor(DescriptorError::Empty)));
}

#[test]
fn depth_guard_is_opt_in() {
    let mut deep = V::Null;
    for _ in 0..64 {
        deep = V::Array(vec![deep]);
    }
    assert_eq!(serialize(deep.clone()).unwrap(), deep);

    let options = MarshalOptions::new().max_depth(8);
    let err = Serializer::with_options(options.clone())
        .serialize(deep.clone())
        .unwrap_err();
    assert!(matches!(err, MarshalError::DepthExceeded { limit: 8 }));
    let err = Deserializer::with_options(options.clone())
        .deserialize(deep)
        .unwrap_err();
    assert!(matches!(err, MarshalError::DepthExceeded { limit: 8 }));

    let shallow = V::object([("a", V::Array(vec![V::Null]))]);
    assert_eq!(
        Serializer::with_options(options).serialize(shallow.clone()).unwrap(),
        shallow
    );
}

#[test]
fn live_images_pass_through_deserialize() {
    let image = RecordingImage::default().with(1.0, 1, 1);
    let back = deserialize(V::Image(image.clone())).unwrap();
    assert_eq!(back, V::Image(image));
}
