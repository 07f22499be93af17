//! Tests for MenuService

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use menutree::application::services::MenuService;
use menutree::application::ApplicationError;
use menutree::domain::{AttributeMap, ContentRef, DomainError, NamePolicy};
use menutree::infrastructure::traits::RealFileSystem;
use menutree::util::testing;

fn create_document(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write menu document");
    path
}

fn service() -> MenuService {
    testing::init_test_setup();
    MenuService::new(Arc::new(RealFileSystem), NamePolicy::default())
}

const MAIN_MENU: &str = r#"{
    "name": "main-item",
    "label": "Main",
    "childAttributeKeys": ["class"],
    "childAttributeValues": ["menu-entry"],
    "children": [
        { "name": "home-item", "label": "Home", "uri": "/" },
        { "name": "home", "kind": "content" },
        { "name": "about-item", "label": "About", "route": "about" },
        {
            "name": "routes",
            "kind": "route",
            "children": [{ "name": "nested-item", "label": "Nested" }]
        },
        { "name": "contact-item", "label": "Contact", "weakContent": "/cms/content/contact" }
    ]
}"#;

#[test]
fn given_mixed_children_when_listing_then_returns_menu_nodes_in_order() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_document(&temp, "main.json", MAIN_MENU);

    // Act
    let service = service();
    let tree = service.load(&path).unwrap();
    let children = service.children_at(&tree, "/").unwrap();

    // Assert
    let paths: Vec<_> = children.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["/main-item/home-item", "/main-item/about-item", "/main-item/contact-item"]
    );
    assert_eq!(
        children[2].options.content,
        Some(ContentRef::from("/cms/content/contact"))
    );
}

#[test]
fn given_root_path_when_projecting_then_child_attributes_exposed() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_document(&temp, "main.json", MAIN_MENU);
    let service = service();
    let tree = service.load(&path).unwrap();

    // Act
    let options = service.options_at(&tree, "/main-item").unwrap();

    // Assert
    assert_eq!(options.label.as_deref(), Some("Main"));
    assert_eq!(
        options.child_attributes.get("class"),
        Some(&"menu-entry".to_string())
    );
    assert!(options.attributes.is_empty());
}

#[test]
fn given_length_mismatch_in_document_when_projecting_then_error_surfaces() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_document(
        &temp,
        "broken.json",
        r#"{ "name": "main-item", "attributeKeys": ["a", "b"], "attributeValues": ["x"] }"#,
    );
    let service = service();
    let tree = service.load(&path).unwrap();

    // Act
    let result = service.options_at(&tree, "/");

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::LengthMismatch { keys: 2, values: 1 }))
    ));
}

#[test]
fn given_modified_tree_when_saving_as_toml_then_reloads_identically() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let source = create_document(&temp, "main.json", MAIN_MENU);
    let service = service();
    let mut tree = service.load(&source).unwrap();

    let about = tree.find_by_path("/main-item/about-item").unwrap();
    let node = tree.menu_mut(about).unwrap();
    let attributes: AttributeMap<String> =
        [("class", "nav".to_string()), ("id", "about".to_string())]
            .into_iter()
            .collect();
    node.set_attributes(&attributes);
    node.set_content(Some(ContentRef::from("/cms/content/about")));
    node.set_weak(false);

    // Act
    let target = temp.path().join("out").join("main.toml");
    service.save(&target, &tree).unwrap();
    let reloaded = service.load(&target).unwrap();

    // Assert
    let about = reloaded.find_by_path("/main-item/about-item").unwrap();
    let node = reloaded.menu(about).unwrap();
    assert_eq!(node.attributes().unwrap(), attributes);
    assert!(!node.is_weak());
    assert_eq!(node.content_switch().weak_slot(), None);
    assert_eq!(node.content(), Some(&ContentRef::from("/cms/content/about")));
    assert_eq!(reloaded.len(), tree.len());

    let saved = std::fs::read_to_string(&target).unwrap();
    assert!(saved.contains("strongContent"));
    assert!(saved.contains("weakMode = false"));
}

#[test]
fn given_strict_policy_when_loading_bad_name_then_fails_but_check_reports() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_document(
        &temp,
        "menu.json",
        r#"{
            "name": "main-item",
            "label": "Main",
            "children": [{ "name": "about", "label": "About" }]
        }"#,
    );
    let service = service();

    // Act
    let strict = service.load(&path);
    let tree = service.load_with(&path, NamePolicy::lenient()).unwrap();
    let problems = service.check(&tree);

    // Assert
    assert!(matches!(
        strict,
        Err(ApplicationError::Domain(DomainError::InvalidNodeName { .. }))
    ));
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].path, "/main-item/about");
}

#[test]
fn given_renamed_node_when_checking_then_missing_suffix_reported() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_document(&temp, "main.json", MAIN_MENU);
    let service = service();
    let mut tree = service.load(&path).unwrap();
    let home = tree.find_by_path("/main-item/home-item").unwrap();

    // Act
    tree.menu_mut(home).unwrap().set_name("home");
    let problems = service.check(&tree);

    // Assert
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].path, "/main-item/home");
    assert!(matches!(
        problems[0].error,
        DomainError::InvalidNodeName { .. }
    ));
}

#[test]
fn given_missing_file_when_loading_then_operation_failed_names_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing.json");

    let err = service().load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn given_malformed_json_when_loading_then_document_error() {
    let temp = TempDir::new().unwrap();
    let path = create_document(&temp, "bad.json", "{ \"label\": ");

    let err = service().load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Document { .. }));
}
