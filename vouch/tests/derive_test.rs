//! Integration tests for `#[derive(Attributes)]`

use vouch::{Attributes, AttributeError, Value};

#[derive(Debug, Clone, Default, PartialEq, Attributes)]
struct Profile {
    nickname: String,
    age: Option<u8>,
    rating: f64,
    public: bool,
    #[attribute(rename = "homepage")]
    url: String,
    #[attribute(skip)]
    cache: Vec<u8>,
}

#[derive(Debug, Clone, Default, Attributes)]
struct Wrapper<T> {
    inner: T,
}

#[test]
fn test_attribute_names_follow_field_order() {
    let profile = Profile::default();
    assert_eq!(
        profile.attribute_names(),
        &["nickname", "age", "rating", "public", "homepage"]
    );
    assert!(profile.responds_to("homepage"));
    assert!(!profile.responds_to("url"));
    assert!(!profile.responds_to("cache"));
}

#[test]
fn test_read_and_write() {
    let mut profile = Profile::default();
    profile.set_attribute("nickname", Value::from("neo")).unwrap();
    profile.set_attribute("age", Value::Int(30)).unwrap();
    profile.set_attribute("rating", Value::Float(4.5)).unwrap();
    profile.set_attribute("public", Value::Bool(true)).unwrap();
    profile.set_attribute("homepage", Value::from("https://example.com")).unwrap();

    assert_eq!(profile.attribute("nickname"), Some(Value::from("neo")));
    assert_eq!(profile.attribute("age"), Some(Value::Int(30)));
    assert_eq!(profile.attribute("rating"), Some(Value::Float(4.5)));
    assert_eq!(profile.attribute("public"), Some(Value::Bool(true)));
    assert_eq!(profile.url, "https://example.com");
    assert_eq!(profile.attribute("cache"), None);

    profile.set_attribute("age", Value::Null).unwrap();
    assert_eq!(profile.age, None);
}

#[test]
fn test_write_errors() {
    let mut profile = Profile::default();
    assert_eq!(
        profile.set_attribute("cache", Value::Null),
        Err(AttributeError::Unknown {
            attribute: "cache".to_string()
        })
    );
    assert!(matches!(
        profile.set_attribute("age", Value::Int(300)),
        Err(AttributeError::TypeMismatch { .. })
    ));
    assert!(matches!(
        profile.set_attribute("public", Value::from("maybe")),
        Err(AttributeError::TypeMismatch { .. })
    ));
    assert_eq!(profile, Profile::default());
}

#[test]
fn test_generic_struct() {
    let mut wrapper = Wrapper::<i32>::default();
    wrapper.set_attribute("inner", Value::Int(7)).unwrap();
    assert_eq!(wrapper.inner, 7);
    assert_eq!(wrapper.attribute("inner"), Some(Value::Int(7)));
}
