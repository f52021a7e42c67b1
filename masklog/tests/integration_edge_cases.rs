//! Edge cases of the traversal: shared and cyclic pointers, the depth limit,
//! interior mutability and dynamically shaped values.

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap, HashSet},
    rc::Rc,
    sync::{Arc, Mutex},
};

use masklog::{
    redact, redact_with_limit, Sensitive, Tag, Value, BORROWED_PLACEHOLDER, CYCLE_PLACEHOLDER,
    DEPTH_PLACEHOLDER, LOCKED_PLACEHOLDER,
};

#[derive(Sensitive)]
struct Node {
    #[sensitive(PhoneNumber)]
    phone: String,
    next: RefCell<Option<Rc<Node>>>,
}

#[test]
fn test_self_reference_renders_a_cycle_marker() {
    let node = Rc::new(Node {
        phone: "13243562635".to_string(),
        next: RefCell::new(None),
    });
    *node.next.borrow_mut() = Some(Rc::clone(&node));

    let rendered = redact(&node, None);
    node.next.borrow_mut().take();

    assert_eq!(
        rendered,
        format!("Node {{ phone: 132****2635, next: {CYCLE_PLACEHOLDER} }}")
    );
}

#[test]
fn test_shared_siblings_are_not_cycles() {
    let shared = Rc::new("13243562635".to_string());
    let pair = vec![Rc::clone(&shared), Rc::clone(&shared)];
    assert_eq!(
        redact(&pair, Some(Tag::PhoneNumber)),
        "[132****2635, 132****2635]"
    );
}

#[test]
fn test_depth_limit_cuts_deep_nesting() {
    let nested = vec![vec![vec![1_u8]]];
    assert_eq!(
        redact_with_limit(&nested, None, 2),
        format!("[[{DEPTH_PLACEHOLDER}]]")
    );
    assert_eq!(redact(&nested, None), "[[[1]]]");
}

#[test]
fn test_held_cells_and_locks_use_placeholders() {
    let cell = RefCell::new("13243562635".to_string());
    let guard = cell.borrow_mut();
    assert_eq!(redact(&cell, None), BORROWED_PLACEHOLDER);
    drop(guard);
    assert_eq!(redact(&cell, Some(Tag::PhoneNumber)), "132****2635");

    let lock = Mutex::new(7_u32);
    let held = lock.lock().unwrap();
    assert_eq!(redact(&lock, None), LOCKED_PLACEHOLDER);
    drop(held);
    assert_eq!(redact(&lock, None), "7");
}

#[test]
fn test_untagged_maps_classify_values_by_key() {
    let params = BTreeMap::from([
        ("mobile", "13243562635"),
        ("card_no", "6225880137581234"),
        ("note", "13243562635"),
    ]);
    assert_eq!(
        redact(&params, None),
        "{card_no: 622588******1234, mobile: 132****2635, note: 13243562635}"
    );
}

#[test]
fn test_hashed_collections_render_sorted() {
    let map: HashMap<&str, u32> = [("b", 2), ("c", 3), ("a", 1)].into_iter().collect();
    assert_eq!(redact(&map, None), "{a: 1, b: 2, c: 3}");

    let set: HashSet<&str> = ["15951232523", "13243562635"].into_iter().collect();
    assert_eq!(
        redact(&set, Some(Tag::PhoneNumber)),
        "[132****2635, 159****2523]"
    );
}

#[test]
fn test_mixed_values_mask_only_strings() {
    let list = Value::List(vec![
        Value::Int(1),
        Value::from("13243562635"),
        Value::Bool(true),
        Value::Nil,
        Value::from("15951232523"),
    ]);
    assert_eq!(
        redact(&list, Some(Tag::PhoneNumber)),
        "[1, 132****2635, true, nil, 159****2523]"
    );
}

#[test]
fn test_records_inside_values_keep_their_own_tags() {
    #[derive(Sensitive)]
    struct Account {
        #[sensitive(RealName)]
        owner: String,
    }

    let body = Value::Map(BTreeMap::from([
        ("account".to_string(), Value::record(Account {
            owner: "张三丰".to_string(),
        })),
        ("phone".to_string(), Value::from("13243562635")),
    ]));
    assert_eq!(
        redact(&body, None),
        "{account: Account { owner: 张*丰 }, phone: 132****2635}"
    );
}

#[test]
fn test_results_and_tuples() {
    let ok: Result<&str, u32> = Ok("13243562635");
    assert_eq!(redact(&ok, Some(Tag::PhoneNumber)), "Ok(132****2635)");
    let err: Result<&str, u32> = Err(404);
    assert_eq!(redact(&err, Some(Tag::PhoneNumber)), "Err(404)");
    assert_eq!(redact(&("a", 1, None::<u8>), None), "(a, 1, None)");
}

#[test]
fn test_locks_forward_the_tag() {
    #[derive(Sensitive)]
    struct Holder {
        #[sensitive(Email)]
        inbox: Mutex<Vec<Value>>,
    }

    let holder = Arc::new(Holder {
        inbox: Mutex::new(vec![Value::from("abcd@xyz.com")]),
    });
    assert_eq!(
        redact(&holder, None),
        "Holder { inbox: [abc***@xyz.com] }"
    );
}

#[test]
fn test_tags_never_touch_numbers() {
    let numbers = vec![13_243_562_635_u64, 6_225_880_137_581_234];
    assert_eq!(
        redact(&numbers, Some(Tag::CardNumber)),
        "[13243562635, 6225880137581234]"
    );
}

#[test]
fn test_query_text_inside_lists_is_not_scanned() {
    // Only string fields of records are scanned for pairs.
    let texts = vec!["mobile=13243562635"];
    assert_eq!(redact(&texts, None), "[mobile=13243562635]");
}
