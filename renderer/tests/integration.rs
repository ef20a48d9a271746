use std::cell::RefCell;
use std::rc::Rc;

use blocks::block::{ContainerTag, ContentTag};
use blocks::mock::{DB_BLOCKS, default_blocks};
use blocks::parser::Parser;
use blocks::Block;
use renderer::element::{BLOCK_ID, CLASS_NAME, KEY};
use renderer::ids::{IdGenerator, SequentialIds, UuidGenerator};
use renderer::session::{NEW_BLOCK_CLASS, NEW_BLOCK_TEXT};
use renderer::{
    Action, ActionError, BlockStore, ElementBody, HtmlOptions, PageSession, UiElement, render,
    render_source, to_html,
};

fn para(id: &str, data: &str, classes: &[&str]) -> Block {
    Block::content(
        id,
        ContentTag::Paragraph,
        classes.iter().map(|c| c.to_string()).collect(),
        data,
    )
}

fn session() -> PageSession {
    PageSession::with_defaults(Box::new(SequentialIds::new("new-")))
}

fn html(elements: &[UiElement]) -> String {
    to_html(elements, HtmlOptions::default())
}

#[test]
fn container_with_one_paragraph() {
    let blocks = vec![Block::container(
        "A",
        ContainerTag::Div,
        vec![],
        vec![para("B", "hi", &[])],
    )];
    let elements = render(&blocks);

    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].tag, "div");
    assert_eq!(elements[0].children().len(), 1);
    assert_eq!(elements[0].children()[0].tag, "p");
    assert_eq!(elements[0].children()[0].text(), Some("hi"));
}

#[test]
fn order_is_preserved() {
    let blocks = vec![
        para("1", "one", &[]),
        Block::container("2", ContainerTag::Section, vec![], vec![]),
        Block::content("3", ContentTag::Heading1, vec![], "three"),
        Block::content("4", ContentTag::Image, vec![], "four.png"),
    ];
    let elements = render(&blocks);

    assert_eq!(elements.len(), blocks.len());
    for (block, element) in blocks.iter().zip(&elements) {
        assert_eq!(element.tag, block.tag_name());
        assert_eq!(element.block_id(), Some(block.id.as_str()));
    }
}

#[test]
fn empty_input_renders_nothing() {
    assert!(render(&[]).is_empty());
}

#[test]
fn render_is_repeatable() {
    let blocks = default_blocks();
    assert_eq!(render(&blocks), render(&blocks));
}

#[test]
fn children_render_recursively() {
    let inner = vec![para("c", "deep", &["x"])];
    let blocks = vec![Block::container(
        "a",
        ContainerTag::Div,
        vec![],
        vec![Block::container("b", ContainerTag::Section, vec![], inner.clone())],
    )];
    let elements = render(&blocks);

    let section = &elements[0].children()[0];
    assert_eq!(section.body, ElementBody::Children(render(&inner)));
}

#[test]
fn class_list_joining() {
    let elements = render(&[para("a", "", &[]), para("b", "", &["a", "b"])]);
    assert_eq!(elements[0].class_name(), "");
    assert_eq!(elements[1].class_name(), "a b");
}

#[test]
fn props_expose_block_id() {
    let elements = render(&[para("xyz", "text", &["c"])]);
    let props = &elements[0].props;
    assert_eq!(props.get(CLASS_NAME).map(String::as_str), Some("c"));
    assert_eq!(props.get(KEY).map(String::as_str), Some("xyz"));
    assert_eq!(props.get(BLOCK_ID).map(String::as_str), Some("xyz"));
}

#[test]
fn payload_is_not_transformed() {
    let elements = render(&[para("a", "  <em>raw</em> & co ", &[])]);
    assert_eq!(elements[0].text(), Some("  <em>raw</em> & co "));
}

#[test]
fn deep_tree_renders() {
    let mut block = para("leaf", "bottom", &[]);
    for level in 0..200 {
        block = Block::container(format!("n{}", level), ContainerTag::Div, vec![], vec![block]);
    }
    let elements = render(&[block]);

    let mut current = &elements[0];
    let mut depth = 1;
    while let Some(child) = current.children().first() {
        current = child;
        depth += 1;
    }
    assert_eq!(depth, 201);
    assert_eq!(current.text(), Some("bottom"));
}

#[test]
fn unknown_type_from_source() {
    let src = r#"[{"id": "x", "type": "span", "classList": [], "data": "hi"}]"#;
    let errors = render_source(src.to_string(), 0).expect_err("span must be rejected");
    assert!(errors.iter().any(|e| e.is_unknown_block_type()));
}

#[test]
fn render_source_matches_render() {
    let parsed = Parser::new(DB_BLOCKS.to_string(), 0)
        .parse()
        .expect("parse failed");
    let from_source = render_source(DB_BLOCKS.to_string(), 0).expect("render failed");
    assert_eq!(from_source, render(&parsed.blocks));
}

#[test]
fn html_output() {
    let blocks = vec![Block::container(
        "A",
        ContainerTag::Div,
        vec!["bg-red-400".to_string()],
        vec![para("B", "a < b & \"c\"", &[])],
    )];
    assert_eq!(
        html(&render(&blocks)),
        "<div class=\"bg-red-400\" data-block-id=\"A\"><p class=\"\" data-block-id=\"B\">a &lt; b &amp; \"c\"</p></div>"
    );
}

#[test]
fn html_pretty_output() {
    let output = to_html(&render(&default_blocks()), HtmlOptions { pretty: true });
    let expected = "\
<div class=\"bg-red-400\" data-block-id=\"1018493\">
  <p class=\"\" data-block-id=\"342423\">This is a test</p>
  <p class=\"\" data-block-id=\"1112222\">This is another paragraph yo</p>
</div>
";
    assert_eq!(output, expected);
}

#[test]
fn html_image_is_void() {
    let blocks = vec![Block::content("i", ContentTag::Image, vec![], "cat.png?a=1&b=\"2\"")];
    assert_eq!(
        html(&render(&blocks)),
        "<img class=\"\" data-block-id=\"i\" src=\"cat.png?a=1&amp;b=&quot;2&quot;\">"
    );
}

#[test]
fn html_empty_container() {
    let blocks = vec![Block::container("s", ContainerTag::Section, vec![], vec![])];
    assert_eq!(
        html(&render(&blocks)),
        "<section class=\"\" data-block-id=\"s\"></section>"
    );
}

#[test]
fn outline_display() {
    let elements = render(&default_blocks());
    assert_eq!(
        elements[0].to_string(),
        "div.bg-red-400 #1018493\n  p #342423 \"This is a test\"\n  p #1112222 \"This is another paragraph yo\"\n"
    );
}

#[test]
fn add_appends_one_paragraph() {
    let mut session = session();
    let before = session.blocks().to_vec();

    let id = session.add();
    let after = session.blocks();

    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(&after[..before.len()], &before[..]);

    let added = &after[before.len()];
    assert_eq!(added.id, id);
    assert_eq!(added.tag_name(), "p");
    assert_eq!(added.class_list, vec![NEW_BLOCK_CLASS]);
    assert_eq!(added.data(), Some(NEW_BLOCK_TEXT));
}

#[test]
fn add_uses_fresh_ids() {
    let mut session = session();
    let first = session.add();
    let second = session.add();
    assert_eq!(first.as_str(), "new-0");
    assert_eq!(second.as_str(), "new-1");
}

#[test]
fn uuid_ids_do_not_repeat() {
    let mut ids = UuidGenerator;
    let a = ids.new_id();
    let b = ids.new_id();
    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 32);
}

#[test]
fn import_appends_payload_in_order() {
    let mut session = session();
    let before = session.blocks().to_vec();
    let expected = Parser::new(DB_BLOCKS.to_string(), 0)
        .parse()
        .expect("parse failed")
        .blocks;

    let imported = session.import().expect("import failed");

    assert_eq!(imported, expected.len());
    assert_eq!(&session.blocks()[..before.len()], &before[..]);
    assert_eq!(&session.blocks()[before.len()..], &expected[..]);
}

#[test]
fn import_twice_appends_twice() {
    let mut session = session();
    session.import().expect("import failed");
    session.import().expect("import failed");
    assert_eq!(session.blocks().len(), 3);
    assert_eq!(session.blocks()[1], session.blocks()[2]);
}

#[test]
fn malformed_import_leaves_state_untouched() {
    let mut session = session().with_import_payload("[{\"id\": \"x\", \"type\": \"span\"", 0);
    let before = session.blocks().to_vec();
    let revision = session.store().revision();

    let err = session.import().expect_err("import should fail");
    assert!(matches!(err, ActionError::MalformedImportPayload(_)));
    assert_eq!(session.blocks(), &before[..]);
    assert_eq!(session.store().revision(), revision);
}

#[test]
fn import_with_unknown_type_is_malformed() {
    let payload = r#"[{"id": "x", "type": "span", "classList": [], "data": "hi"}]"#;
    let mut session = session().with_import_payload(payload, 0);

    match session.import() {
        Err(ActionError::MalformedImportPayload(errors)) => {
            assert!(errors[0].is_unknown_block_type());
        }
        other => panic!("expected malformed payload, got {:?}", other),
    }
    assert_eq!(session.blocks().len(), 1);
}

#[test]
fn apply_dispatches_actions() {
    let mut session = session();
    session.apply(Action::Add).expect("add failed");
    session.apply(Action::Import).expect("import failed");
    session.apply(Action::Add).expect("add failed");

    let tags: Vec<&str> = session.blocks().iter().map(Block::tag_name).collect();
    assert_eq!(tags, vec!["div", "p", "div", "p"]);
}

#[test]
fn parse_actions() {
    assert_eq!("add".parse::<Action>().ok(), Some(Action::Add));
    assert_eq!(" Import ".parse::<Action>().ok(), Some(Action::Import));
    assert!(matches!(
        "delete".parse::<Action>(),
        Err(ActionError::UnknownAction(_))
    ));
}

#[test]
fn subscribers_see_every_replace() {
    let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let mut session = session();

    let sink = Rc::clone(&seen);
    session
        .store_mut()
        .subscribe(move |blocks| sink.borrow_mut().push(blocks.len()));

    session.add();
    session.import().expect("import failed");

    assert_eq!(*seen.borrow(), vec![2, 3]);
    assert_eq!(session.store().revision(), 2);
}

#[test]
fn subscriber_renders_fresh_view() {
    let views: Rc<RefCell<Vec<Vec<UiElement>>>> = Rc::new(RefCell::new(Vec::new()));
    let mut store = BlockStore::new(Vec::new());
    assert!(store.is_empty());

    let sink = Rc::clone(&views);
    store.subscribe(move |blocks| sink.borrow_mut().push(render(blocks)));
    store.replace(vec![para("a", "first", &[])]);
    assert_eq!(store.len(), 1);

    let views = views.borrow();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0][0].text(), Some("first"));
}

#[test]
fn view_renders_current_state() {
    let mut session = session();
    session.add();
    let view = session.view();
    assert_eq!(view.len(), 2);
    assert_eq!(view[1].class_name(), NEW_BLOCK_CLASS);
    assert_eq!(view[1].block_id(), Some("new-0"));
}

#[test]
fn session_serializes_to_wire_format() {
    let mut session = session();
    session.add();
    let json = serde_json::to_value(session.blocks()).expect("serialize");
    assert_eq!(json[1]["type"], "p");
    assert_eq!(json[1]["classList"][0], NEW_BLOCK_CLASS);
    assert_eq!(json[0]["children"][0]["data"], "This is a test");
}
