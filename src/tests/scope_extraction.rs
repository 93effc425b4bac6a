use std::{fs, path::PathBuf, sync::Arc};

use itertools::Itertools;
use rstest::rstest;
use speculoos::prelude::*;

use crate::{
    extract,
    extract::MAX_NESTING_DEPTH,
    flow::{verify_flow, NULL_POINTER_CHECK},
    message::MessageStack,
    span::Span,
    tests::helpers::{extract_lines, tracing_subscribe},
    Error, ScopeKind, ScopeKinds, ScopeTree, SourceText,
};

fn kinds_and_names(tree: &ScopeTree, kinds: ScopeKinds) -> Vec<(ScopeKind, String)> {
    tree.descendants_of_kind(tree.root(), kinds)
        .into_iter()
        .map(|id| (tree.get(id).kind(), tree.get(id).name().to_owned()))
        .collect()
}

#[test]
fn test_union_is_a_class() {
    tracing_subscribe();

    let tree = extract_lines(&["union TestCase {", "};"]);

    assert_that(&tree.dump())
        .is_equal_to("Source : unit.cpp\n  Class : TestCase\n".to_owned());
    let class = tree.children_of_kind(tree.root(), ScopeKinds::CLASS)[0];
    assert_that(tree.get(class).span()).is_equal_to(&Span::new((0, 0), (1, 0)));
    assert_that(&tree.scope_lines(class)).is_equal_to(vec!["union TestCase {", "}"]);
    assert_that(&tree.scope_text(class)).is_equal_to("union TestCase {\n}".to_owned());
}

#[test]
fn test_member_of_union() {
    tracing_subscribe();

    let tree = extract_lines(&["union TestCase {", "  int a;", "};"]);

    assert_that(&tree.dump()).is_equal_to(
        "Source : unit.cpp\n  Class : TestCase\n    ClassVariable : a\n".to_owned(),
    );
}

#[test]
fn test_keyword_inside_identifier() {
    tracing_subscribe();

    let tree = extract_lines(&["int unionTest;", "int testunion;"]);

    assert_that(&kinds_and_names(&tree, ScopeKinds::ALL)).is_equal_to(vec![
        (ScopeKind::GlobalVariable, "unionTest".to_owned()),
        (ScopeKind::GlobalVariable, "testunion".to_owned()),
    ]);
}

#[test]
fn test_constructor_style_globals() {
    tracing_subscribe();

    let tree = extract_lines(&["int counter(5);", "std::string label(\"abc\");"]);

    assert_that(&kinds_and_names(&tree, ScopeKinds::VARIABLE)).is_equal_to(vec![
        (ScopeKind::GlobalVariable, "counter".to_owned()),
        (ScopeKind::GlobalVariable, "label".to_owned()),
    ]);
}

#[test]
fn test_global_prototype_is_only_a_function() {
    tracing_subscribe();

    let tree = extract_lines(&["int compute(int value, char* name);"]);

    assert_that(&tree.descendants_of_kind(tree.root(), ScopeKinds::VARIABLE)).is_empty();
    assert_that(&kinds_and_names(&tree, ScopeKinds::FUNCTION))
        .is_equal_to(vec![(ScopeKind::FreeFunction, "compute".to_owned())]);
}

#[test]
fn test_null_pointer_use() {
    tracing_subscribe();

    let tree = extract_lines(&["int main(){", "  int *p;", "  p = NULL;", "  cout << p;", "}"]);
    let mut messages = MessageStack::default();
    verify_flow(&tree, &mut messages);

    let flagged = messages.get(NULL_POINTER_CHECK).to_vec();
    assert_that(&flagged).has_length(1);
    assert_that(&flagged[0].line).is_equal_to(3);
}

#[test]
fn test_continued_define() {
    tracing_subscribe();

    let tree = extract_lines(&[
        "#define FOO(x) \\",
        "  do { bar(x); \\",
        "  } while (0)",
        "int after;",
    ]);

    let defines = kinds_and_names(&tree, ScopeKinds::GLOBAL_DEFINE);
    assert_that(&defines).is_equal_to(vec![(
        ScopeKind::GlobalDefine,
        "#define FOO(x) \\  do { bar(x); \\  } while (0)".to_owned(),
    )]);
    assert_that(&tree.descendants_of_kind(tree.root(), ScopeKinds::FUNCTION)).is_empty();
    assert_that(&tree.descendants_of_kind(tree.root(), ScopeKinds::CONDITIONAL)).is_empty();
    assert_that(&kinds_and_names(&tree, ScopeKinds::VARIABLE))
        .is_equal_to(vec![(ScopeKind::GlobalVariable, "after".to_owned())]);
}

#[test]
fn test_commented_out_declaration() {
    tracing_subscribe();

    let tree = extract_lines(&["/*", "void notAFunction(int a);", "int notAVariable;", "*/"]);

    assert_that(&tree.descendants_of_kind(tree.root(), ScopeKinds::FUNCTION)).is_empty();
    assert_that(&tree.descendants_of_kind(tree.root(), ScopeKinds::VARIABLE)).is_empty();
    assert_that(&tree.children_of_kind(tree.root(), ScopeKinds::MULTI_LINE_COMMENT))
        .has_length(1);
}

#[test]
fn test_nested_scopes() {
    tracing_subscribe();

    let tree = extract_lines(&[
        "namespace app {",
        "class Engine {",
        "  int speed;",
        "  void start() {",
        "    if (speed > 0) {",
        "      int boost = 1;",
        "    }",
        "  }",
        "};",
        "}",
    ]);

    assert_that(&tree.dump()).is_equal_to(
        [
            "Source : unit.cpp",
            "  Namespace : app",
            "    Class : Engine",
            "      ClassVariable : speed",
            "      ClassFunction : start",
            "        Conditional : if",
            "          FunctionVariable : boost",
            "",
        ]
        .join("\n"),
    );
    let boost = tree.descendants_of_kind(tree.root(), ScopeKinds::FUNCTION_VARIABLE)[0];
    assert_that(&tree.depth(boost)).is_equal_to(5);
}

#[test]
fn test_string_literals_and_comments_are_queryable() {
    tracing_subscribe();

    let tree = extract_lines(&["const char* s = \"{ if (\"; // }", "int x;"]);

    assert_that(&tree.is_within_string_literal((0, 18))).is_true();
    assert_that(&tree.is_within_comment((0, 28))).is_true();
    assert_that(&tree.is_within_comment((1, 0))).is_false();
    assert_that(&tree.string_literals().to_vec()).has_length(1);
    assert_that(&tree.descendants_of_kind(tree.root(), ScopeKinds::CONDITIONAL)).is_empty();
}

#[test]
fn test_unclosed_scope_is_unbalanced() {
    let result = extract(Arc::new(SourceText::from_lines(
        "broken.cpp",
        ["void broken() {", "  if (x) {", "}"],
    )));
    assert!(matches!(result, Err(Error::UnbalancedStructure { .. })));
}

#[test]
fn test_nesting_ceiling() {
    let lines = (0..=MAX_NESTING_DEPTH)
        .map(|_| "namespace deep {")
        .chain((0..=MAX_NESTING_DEPTH).map(|_| "}"))
        .collect_vec();
    let result = extract(Arc::new(SourceText::from_lines("deep.cpp", &lines)));
    assert!(matches!(result, Err(Error::UnbalancedStructure { .. })));
}

#[rstest]
fn test_fixture_invariants(#[files("tests/fixtures/*.cpp")] path: PathBuf) {
    tracing_subscribe();

    let text = fs::read_to_string(&path).unwrap();
    let name = path.display().to_string();
    let tree = extract(Arc::new(SourceText::from_text(name.clone(), &text))).unwrap();

    let descendants = tree.descendants(tree.root());
    assert_that(&descendants.iter().unique().count()).is_equal_to(tree.len() - 1);
    for &id in &descendants {
        let scope = tree.get(id);
        let parent = scope.parent().unwrap();
        assert!(
            scope.span().is_within(tree.get(parent).span()),
            "{} escapes its parent",
            scope.name()
        );
        assert!(!scope.kind().is_unresolved(), "{} was not refined", scope.name());
        assert!(tree.depth(id) <= descendants.len());
    }

    let again = extract(Arc::new(SourceText::from_text(name, &text))).unwrap();
    assert_that(&again.dump()).is_equal_to(tree.dump());
}

#[test]
fn test_shapes_fixture() {
    tracing_subscribe();

    let path = crate::tests::helpers::fixtures_dir().join("shapes.cpp");
    let tree = extract(Arc::new(SourceText::read(&path).unwrap())).unwrap();

    assert_that(&kinds_and_names(&tree, ScopeKinds::FUNCTION)).is_equal_to(vec![
        (ScopeKind::ClassFunction, "Shape".to_owned()),
        (ScopeKind::ClassFunction, "~Shape".to_owned()),
        (ScopeKind::ClassFunction, "area".to_owned()),
        (ScopeKind::ClassFunction, "Shape::Shape".to_owned()),
        (ScopeKind::ClassFunction, "Shape::~Shape".to_owned()),
        (ScopeKind::FreeFunction, "scale".to_owned()),
    ]);
    assert_that(&kinds_and_names(&tree, ScopeKinds::VARIABLE)).is_equal_to(vec![
        (ScopeKind::ClassVariable, "name_".to_owned()),
        (ScopeKind::ClassVariable, "x".to_owned()),
        (ScopeKind::ClassVariable, "y".to_owned()),
        (ScopeKind::FunctionVariable, "result".to_owned()),
    ]);
    assert_that(
        &kinds_and_names(&tree, ScopeKinds::CONDITIONAL)
            .into_iter()
            .map(|(_, name)| name)
            .collect_vec(),
    )
    .is_equal_to(vec!["for".to_owned(), "if".to_owned(), "else".to_owned()]);
    assert_that(&tree.children_of_kind(tree.root(), ScopeKinds::GLOBAL_DEFINE)).has_length(1);
    assert_that(&kinds_and_names(&tree, ScopeKinds::ENUM))
        .is_equal_to(vec![(ScopeKind::Enum, "Kind".to_owned())]);
}
