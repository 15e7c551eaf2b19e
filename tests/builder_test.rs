//! Tests for HierarchyBuilder

use std::collections::BTreeSet;

use rstest::rstest;

use flavorwheel::domain::{
    DomainError, HierarchyBuilder, LeafOrder, Row, TreeNode, NODE_WEIGHT, ROOT_LABEL,
};

fn rows(data: &[(&str, &str, &str)]) -> Vec<Row> {
    data.iter()
        .map(|(b, m, f)| Row::new(*b, *m, *f))
        .collect()
}

fn names(node: &TreeNode) -> Vec<&str> {
    node.children.iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn given_reference_rows_when_building_then_matches_expected_hierarchy() {
    // Arrange
    let input = rows(&[
        ("Fruity", "Berry", "Blackberry"),
        ("Fruity", "Berry", "Raspberry"),
        ("Fruity", "Berry", "Blackberry"),
        ("Floral", "", ""),
    ]);

    // Act
    let root = HierarchyBuilder::build(input);

    // Assert
    assert_eq!(root.name, ROOT_LABEL);
    assert_eq!(names(&root), vec!["Fruity", "Floral"]);

    let fruity = root.child("Fruity").unwrap();
    assert_eq!(names(fruity), vec!["Berry"]);
    assert_eq!(
        names(fruity.child("Berry").unwrap()),
        vec!["Blackberry", "Raspberry"]
    );

    let floral = root.child("Floral").unwrap();
    assert_eq!(names(floral), vec![""]);
    assert!(floral.child("").unwrap().children.is_empty());
}

#[test]
fn given_zero_rows_when_building_then_root_has_no_children() {
    // Act
    let root = HierarchyBuilder::build(Vec::new());

    // Assert
    assert_eq!(root.name, ROOT_LABEL);
    assert!(root.children.is_empty());
    assert_eq!(root.weight, None);
}

#[test]
fn given_any_rows_when_building_then_every_non_root_node_weighs_one() {
    // Arrange
    let input = rows(&[
        ("Sweet", "Brown Sugar", "Molasses"),
        ("Sweet", "Vanilla", ""),
        ("Roasted", "Cereal", "Grain"),
    ]);

    // Act
    let root = HierarchyBuilder::build(input);

    // Assert
    fn check(node: &TreeNode) {
        assert_eq!(node.weight, Some(NODE_WEIGHT), "node {:?}", node.name);
        node.children.iter().for_each(check);
    }
    root.children.iter().for_each(check);
    assert_eq!(root.weight, None);
}

#[test]
fn given_unsorted_rows_when_building_then_keeps_first_seen_order_at_every_level() {
    // Arrange
    let input = rows(&[
        ("Spices", "Brown Spice", "Nutmeg"),
        ("Floral", "Floral", "Rose"),
        ("Spices", "Pepper", ""),
        ("Spices", "Brown Spice", "Anise"),
        ("Floral", "Black Tea", ""),
        ("Spices", "Brown Spice", "Clove"),
    ]);

    // Act
    let root = HierarchyBuilder::build(input);

    // Assert
    assert_eq!(names(&root), vec!["Spices", "Floral"]);
    let spices = root.child("Spices").unwrap();
    assert_eq!(names(spices), vec!["Brown Spice", "Pepper"]);
    assert_eq!(
        names(spices.child("Brown Spice").unwrap()),
        vec!["Nutmeg", "Anise", "Clove"]
    );
    assert_eq!(names(root.child("Floral").unwrap()), vec!["Floral", "Black Tea"]);
}

#[test]
fn given_same_middle_under_two_outers_when_building_then_keeps_them_separate() {
    // Arrange
    let input = rows(&[
        ("Green/Vegetative", "Green/Vegetative", "Peapod"),
        ("Floral", "Green/Vegetative", "Herb-like"),
    ]);

    // Act
    let root = HierarchyBuilder::build(input);

    // Assert
    let green = root.child("Green/Vegetative").unwrap();
    let floral = root.child("Floral").unwrap();
    assert_eq!(names(green.child("Green/Vegetative").unwrap()), vec!["Peapod"]);
    assert_eq!(
        names(floral.child("Green/Vegetative").unwrap()),
        vec!["Herb-like"]
    );
}

#[test]
fn given_same_input_when_building_twice_then_trees_are_identical() {
    // Arrange
    let input = rows(&[
        ("Fruity", "Citrus Fruit", "Lime"),
        ("Fruity", "Citrus Fruit", "Lemon"),
        ("Other", "Chemical", "Rubber"),
        ("Fruity", "Citrus Fruit", "Lime"),
    ]);

    // Act
    let first = HierarchyBuilder::build(input.clone());
    let second = HierarchyBuilder::build(input);

    // Assert
    assert_eq!(first, second);
}

#[rstest]
#[case::single_row(&[("A", "B", "C")], 1)]
#[case::duplicate_outer(&[("A", "B", "C"), ("A", "D", "E")], 1)]
#[case::distinct_outer(&[("A", "B", "C"), ("X", "B", "C"), ("Y", "", "")], 3)]
#[case::empty_outer_label(&[("", "B", "C"), ("A", "B", "C")], 2)]
fn given_rows_when_building_then_root_children_equal_distinct_basic(
    #[case] data: &[(&str, &str, &str)],
    #[case] expected: usize,
) {
    // Act
    let root = HierarchyBuilder::build(rows(data));

    // Assert
    let distinct: BTreeSet<&str> = data.iter().map(|(b, _, _)| *b).collect();
    assert_eq!(root.children.len(), distinct.len());
    assert_eq!(root.children.len(), expected);
}

#[rstest]
#[case::all_duplicates(&["Rose", "Rose", "Rose"], &["Rose"])]
#[case::mixed_with_empty(&["Rose", "", "Jasmine", ""], &["Rose", "Jasmine"])]
#[case::only_empty(&["", ""], &[])]
fn given_leaves_for_one_pair_when_building_then_children_are_distinct_non_empty(
    #[case] leaves: &[&str],
    #[case] expected: &[&str],
) {
    // Arrange
    let input: Vec<Row> = leaves
        .iter()
        .map(|leaf| Row::new("Floral", "Floral", *leaf))
        .collect();

    // Act
    let root = HierarchyBuilder::build(input);

    // Assert
    let middle = root.child("Floral").unwrap().child("Floral").unwrap();
    assert_eq!(names(middle), expected.to_vec());
    assert_eq!(root.depth(), if expected.is_empty() { 3 } else { 4 });
}

#[test]
fn given_row_error_in_stream_when_extending_then_aborts_with_missing_field() {
    // Arrange
    let stream = vec![
        Ok(Row::new("Fruity", "Berry", "Blackberry")),
        Err(DomainError::MissingField {
            field: "Middle".into(),
            line: 3,
        }),
        Ok(Row::new("Floral", "Floral", "Rose")),
    ];

    // Act
    let result = HierarchyBuilder::new().extend_rows(stream);

    // Assert
    assert_eq!(
        result.unwrap_err(),
        DomainError::MissingField {
            field: "Middle".into(),
            line: 3
        }
    );
}

#[test]
fn given_custom_root_and_sorted_order_when_finishing_then_applies_both() {
    // Arrange
    let stream = rows(&[
        ("Nutty/Cocoa", "Nutty", "Peanuts"),
        ("Nutty/Cocoa", "Nutty", "Almond"),
        ("Nutty/Cocoa", "Nutty", "Hazelnut"),
    ])
    .into_iter()
    .map(Ok);

    // Act
    let (root, stats) = HierarchyBuilder::with_root("wheel")
        .leaf_order(LeafOrder::Sorted)
        .extend_rows(stream)
        .unwrap()
        .finish();

    // Assert
    assert_eq!(root.name, "wheel");
    assert_eq!(
        names(root.child("Nutty/Cocoa").unwrap().child("Nutty").unwrap()),
        vec!["Almond", "Hazelnut", "Peanuts"]
    );
    assert_eq!(stats.leaves, 3);
    assert_eq!(root.count_at(3), 3);
}

#[rstest]
#[case("insertion", LeafOrder::Insertion)]
#[case("Sorted", LeafOrder::Sorted)]
#[case(" sorted ", LeafOrder::Sorted)]
fn given_leaf_order_name_when_parsing_then_resolves(#[case] input: &str, #[case] expected: LeafOrder) {
    assert_eq!(input.parse::<LeafOrder>().unwrap(), expected);
}

#[test]
fn given_unknown_leaf_order_when_parsing_then_errors() {
    assert!("random".parse::<LeafOrder>().is_err());
}
