//! Integration tests for `#[derive(Inspect)]`.

#![cfg(feature = "derive")]

use std::time::Duration;

use matchkit::assertions::matcher::equal;
use matchkit::format::{format_type, object, Kind, Visibility};
use matchkit::{expect, Inspect};

#[derive(Inspect)]
pub struct Person {
    pub name: String,
    pub age: u8,
    pub(crate) id: u64,
    password: String,
}

impl Person {
    fn new(name: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            age: 36,
            id: 7,
            password: password.to_string(),
        }
    }
}

#[derive(Inspect)]
pub struct Point(pub i32, pub i32);

#[derive(Inspect)]
pub struct Marker;

#[derive(Inspect)]
pub struct Wrapper<T> {
    pub inner: T,
}

#[derive(Inspect)]
pub struct Team {
    pub name: String,
    pub members: Vec<Person>,
}

#[derive(Inspect)]
pub struct Job {
    pub id: u32,
    #[inspect(debug)]
    pub timeout: Duration,
    #[inspect(skip)]
    #[allow(dead_code)]
    callback: fn(u32, u32, u32, u32) -> u32,
}

/// Only `pub` fields are rendered.
#[test]
fn test_renders_public_fields_only() {
    let person = Person::new("Ada", "hunter2");
    assert_eq!(
        object(&person.inspect(), 1),
        "    <Person>: {name: \"Ada\", age: 36}"
    );
}

/// Every field is kept in the value, tagged with its visibility.
#[test]
fn test_fields_carry_visibility() {
    let value = Person::new("Ada", "hunter2").inspect();
    let Kind::Record(fields) = value.kind() else {
        panic!("expected a record");
    };

    let tags: Vec<_> = fields
        .iter()
        .map(|field| (&*field.name, field.visibility))
        .collect();
    assert_eq!(
        tags,
        vec![
            ("name", Visibility::Public),
            ("age", Visibility::Public),
            ("id", Visibility::Restricted),
            ("password", Visibility::Private),
        ]
    );
}

/// Hidden fields still take part in equality.
#[test]
fn test_equality_sees_private_fields() {
    let a = Person::new("Ada", "hunter2");
    let b = Person::new("Ada", "correct horse");

    expect(&a).to(equal(&a));
    expect(&a).to_not(equal(&b));
}

#[test]
fn test_tuple_and_unit_structs() {
    assert_eq!(object(&Point(1, 2).inspect(), 1), "    <Point>: {0: 1, 1: 2}");
    assert_eq!(object(&Marker.inspect(), 1), "    <Marker>: {}");
}

#[test]
fn test_generic_struct() {
    let value = Wrapper { inner: true }.inspect();
    assert_eq!(format_type(&value), "Wrapper<bool>");
    expect(Wrapper { inner: 1u16 }).to_not(equal(Wrapper { inner: 2u16 }));
}

#[test]
fn test_nested_records_use_long_form() {
    let team = Team {
        name: "core".to_string(),
        members: vec![Person::new("Ada", "x")],
    };
    assert_eq!(
        object(&team.inspect(), 1),
        "    <Team>: {\n        name: \"core\",\n        members: [\n            {name: \"Ada\", age: 36},\n        ],\n    }"
    );
}

#[test]
fn test_field_options() {
    let job = Job {
        id: 3,
        timeout: Duration::from_secs(2),
        callback: |a, b, c, d| a + b + c + d,
    };
    assert_eq!(object(&job.inspect(), 1), "    <Job>: {id: 3, timeout: 2s}");
}

/// A `Debug`-rendered field is named after its own type, not the borrow.
#[test]
fn test_debug_field_type_name() {
    let job = Job {
        id: 3,
        timeout: Duration::from_millis(1500),
        callback: |a, b, c, d| a * b * c * d,
    };
    let value = job.inspect();
    let Kind::Record(fields) = value.kind() else {
        panic!("expected a record");
    };
    let timeout = &fields[1].value;
    assert_eq!(&*fields[1].name, "timeout");
    assert_eq!(format_type(timeout), "Duration");
    assert_eq!(object(timeout, 1), "    <Duration>: 1.5s");
}

/// Byte vectors inside records keep their text body.
#[test]
fn test_byte_field() {
    let packet = Wrapper {
        inner: b"ping".to_vec(),
    };
    assert_eq!(object(&packet.inspect(), 1), "    <Wrapper<Vec<u8>>>: {inner: \"ping\"}");
    assert!(format_type(&packet.inner.inspect()).starts_with("Vec<u8> | len:4, cap:"));
}
