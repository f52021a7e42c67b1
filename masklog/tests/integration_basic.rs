//! End-to-end tests for the `Sensitive` derive and the redaction entrypoints.
//!
//! These tests exercise the integration of:
//! - field tags selecting a masking rule,
//! - tag inheritance through containers and bare `#[sensitive]`, and
//! - flattening, skipping and the generated `Debug`.

use std::collections::BTreeMap;

use masklog::{redact, Sensitive, Tag};

#[derive(Sensitive)]
struct Payment {
    #[sensitive(CardNumber)]
    card: String,
    #[sensitive(IdentityCard)]
    id_card: String,
    #[sensitive(PhoneNumber)]
    mobile: String,
    #[sensitive(Email)]
    email: String,
    #[sensitive(AlipayAccount)]
    alipay: String,
    #[sensitive(RealName)]
    name: String,
    amount: u64,
}

fn payment() -> Payment {
    Payment {
        card: "6225880137581234".to_string(),
        id_card: "110101199003077777".to_string(),
        mobile: "13243562635".to_string(),
        email: "abcd@xyz.com".to_string(),
        alipay: "15951232523".to_string(),
        name: "张三丰".to_string(),
        amount: 100,
    }
}

#[test]
fn test_every_tag_masks_its_field() {
    assert_eq!(
        redact(&payment(), None),
        "Payment { card: 622588******1234, id_card: 1101**********7777, \
         mobile: 132****2635, email: abc***@xyz.com, alipay: 159****2523, \
         name: 张*丰, amount: 100 }"
    );
}

#[test]
fn test_debug_prints_the_redacted_form() {
    let rendered = format!("{:?}", payment());
    assert_eq!(rendered, redact(&payment(), None));
    assert!(!rendered.contains("13243562635"));
}

#[test]
fn test_untagged_fields_pass_through() {
    #[derive(Sensitive)]
    struct Plain {
        mobile: String,
        count: i32,
        ok: bool,
    }

    let plain = Plain {
        mobile: "13243562635".to_string(),
        count: -3,
        ok: true,
    };
    assert_eq!(
        redact(&plain, None),
        "Plain { mobile: 13243562635, count: -3, ok: true }"
    );
}

#[test]
fn test_tag_reaches_through_containers() {
    #[derive(Sensitive)]
    struct Contacts {
        #[sensitive(PhoneNumber)]
        phones: Vec<String>,
        #[sensitive(PhoneNumber)]
        backup: Option<String>,
        #[sensitive(PhoneNumber)]
        by_name: BTreeMap<String, String>,
    }

    let contacts = Contacts {
        phones: vec!["13243562635".to_string(), "15951232523".to_string()],
        backup: Some("13243562635".to_string()),
        by_name: BTreeMap::from([("home".to_string(), "15951232523".to_string())]),
    };
    assert_eq!(
        redact(&contacts, None),
        "Contacts { phones: [132****2635, 159****2523], backup: 132****2635, \
         by_name: {home: 159****2523} }"
    );
}

#[test]
fn test_struct_boundary_resets_the_tag() {
    #[derive(Sensitive)]
    struct Inner {
        note: String,
        #[sensitive]
        inherited: String,
    }

    #[derive(Sensitive)]
    struct Outer {
        #[sensitive(PhoneNumber)]
        inner: Inner,
    }

    let outer = Outer {
        inner: Inner {
            note: "13243562635".to_string(),
            inherited: "13243562635".to_string(),
        },
    };
    assert_eq!(
        redact(&outer, None),
        "Outer { inner: Inner { note: 13243562635, inherited: 132****2635 } }"
    );
}

#[test]
fn test_top_level_tag_is_inherited() {
    #[derive(Sensitive)]
    struct Holder(#[sensitive] String, String);

    let holder = Holder("13243562635".to_string(), "13243562635".to_string());
    assert_eq!(
        redact(&holder, Some(Tag::PhoneNumber)),
        "Holder(132****2635, 13243562635)"
    );
    assert_eq!(redact(&holder, None), "Holder(13243562635, 13243562635)");
}

#[test]
fn test_flatten_embeds_fields() {
    #[derive(Sensitive)]
    struct Base {
        #[sensitive(PhoneNumber)]
        mobile: String,
    }

    #[derive(Sensitive)]
    struct Extended {
        id: u32,
        #[sensitive(flatten)]
        base: Base,
        status: String,
    }

    let extended = Extended {
        id: 7,
        base: Base {
            mobile: "13243562635".to_string(),
        },
        status: "open".to_string(),
    };
    assert_eq!(
        redact(&extended, None),
        "Extended { id: 7, mobile: 132****2635, status: open }"
    );
}

#[test]
fn test_skipped_fields_are_omitted() {
    #[derive(Sensitive)]
    struct Login {
        user: String,
        #[sensitive(skip)]
        #[allow(dead_code)]
        password: String,
    }

    let login = Login {
        user: "alice".to_string(),
        password: "hunter2".to_string(),
    };
    assert_eq!(redact(&login, None), "Login { user: alice }");
}

#[test]
fn test_enum_variants() {
    #[derive(Sensitive)]
    enum Payee {
        Anonymous,
        Card(#[sensitive(CardNumber)] String),
        Person {
            #[sensitive(RealName)]
            name: String,
            age: u8,
        },
    }

    assert_eq!(redact(&Payee::Anonymous, None), "Anonymous");
    assert_eq!(
        redact(&Payee::Card("6225880137581234".to_string()), None),
        "Card(622588******1234)"
    );
    assert_eq!(
        redact(
            &Payee::Person {
                name: "张三".to_string(),
                age: 30,
            },
            None
        ),
        "Person { name: 张*, age: 30 }"
    );
}

#[test]
fn test_generic_struct() {
    #[derive(Sensitive)]
    struct Envelope<T> {
        #[sensitive(Email)]
        items: Vec<T>,
    }

    let envelope = Envelope {
        items: vec!["abcd@xyz.com".to_string()],
    };
    assert_eq!(redact(&envelope, None), "Envelope { items: [abc***@xyz.com] }");
}

#[test]
fn test_phantom_parameter_needs_no_impl() {
    use std::marker::PhantomData;

    struct Opaque;

    #[derive(Sensitive)]
    struct TypedId<T> {
        id: String,
        _marker: PhantomData<T>,
    }

    let id: TypedId<Opaque> = TypedId {
        id: "order-1".to_string(),
        _marker: PhantomData,
    };
    assert_eq!(
        redact(&id, None),
        "TypedId { id: order-1, _marker: PhantomData }"
    );
}

#[test]
fn test_skip_debug_leaves_debug_to_the_user() {
    use std::fmt;

    #[derive(Sensitive)]
    #[sensitive(skip_debug)]
    struct Token {
        #[sensitive(CardNumber)]
        value: String,
    }

    impl fmt::Debug for Token {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("Token(..)")
        }
    }

    let token = Token {
        value: "6225880137581234".to_string(),
    };
    assert_eq!(format!("{token:?}"), "Token(..)");
    assert_eq!(redact(&token, None), "Token { value: 622588******1234 }");
}

#[test]
fn test_untagged_string_fields_are_scanned() {
    #[derive(Sensitive)]
    struct Request {
        query: String,
    }

    let request = Request {
        query: "mobile=13243562635&page=2".to_string(),
    };
    assert_eq!(
        redact(&request, None),
        "Request { query: mobile=132****2635&page=2 }"
    );
}

#[test]
fn test_request_uri_fields_mask_the_first_query_pair() {
    #[derive(Sensitive)]
    struct Request {
        request_uri: String,
    }

    let request = Request {
        request_uri: "/pay?card_no=6225880137581234&mobile=13243562635".to_string(),
    };
    assert_eq!(
        redact(&request, None),
        "Request { request_uri: /pay?card_no=622588******1234&mobile=132****2635 }"
    );
}

#[test]
fn test_nested_records_keep_their_own_tags_under_a_tagged_list() {
    #[derive(Sensitive)]
    struct Person {
        #[sensitive(RealName)]
        name: String,
        note: String,
    }

    #[derive(Sensitive)]
    struct Directory {
        #[sensitive(PhoneNumber)]
        phones: Vec<String>,
        plain: Vec<String>,
        #[sensitive(PhoneNumber)]
        people: Vec<Person>,
    }

    let directory = Directory {
        phones: vec!["13243562635".to_string()],
        plain: vec!["13243562635".to_string()],
        people: vec![Person {
            name: "张三".to_string(),
            note: "13243562635".to_string(),
        }],
    };
    assert_eq!(
        redact(&directory, None),
        "Directory { phones: [132****2635], plain: [13243562635], \
         people: [Person { name: 张*, note: 13243562635 }] }"
    );
}
