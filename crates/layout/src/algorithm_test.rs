use crate::config::Config;
use crate::test_utils::{assert_layout, counting_measure, fixed_measure, root_with_children, text_measure};
use crate::tree::LayoutTree;
use crate::{LayoutEdge, LayoutError};
use flexlay_style::{Align, Direction, Display, Edge, FlexDirection, Justify, PositionType, Wrap};
use flexlay_types::Size;
use std::sync::Arc;
use std::sync::atomic::Ordering;

fn layout(tree: &mut LayoutTree, root: flexlay_types::NodeId) {
    tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr).unwrap();
}

#[test]
fn test_column_children_stretch_across() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 2);
    tree.set_height(children[0], 10.0).unwrap();
    tree.set_height(children[1], 20.0).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, root, (0.0, 0.0, 100.0, 100.0));
    assert_layout(&tree, children[0], (0.0, 0.0, 100.0, 10.0));
    assert_layout(&tree, children[1], (0.0, 10.0, 100.0, 20.0));
    assert!(tree.has_new_layout(children[1]).unwrap());
}

#[test]
fn test_flex_grow_takes_remaining_space() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 2);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_flex_grow(children[0], 1.0).unwrap();
    tree.set_width(children[1], 25.0).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (0.0, 0.0, 75.0, 100.0));
    assert_layout(&tree, children[1], (75.0, 0.0, 25.0, 100.0));
}

#[test]
fn test_max_size_caps_growth() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 1);
    tree.set_flex_grow(children[0], 1.0).unwrap();
    tree.set_max_height(children[0], 50.0).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (0.0, 0.0, 100.0, 50.0));
}

#[test]
fn test_web_defaults_shrink_overflowing_items() {
    let mut config = Config::new();
    config.use_web_defaults = true;
    let mut tree = LayoutTree::with_config(config);
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 2);
    tree.set_width(children[0], 60.0).unwrap();
    tree.set_width(children[1], 60.0).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (0.0, 0.0, 50.0, 100.0));
    assert_layout(&tree, children[1], (50.0, 0.0, 50.0, 100.0));
}

#[test]
fn test_overflow_without_shrink_is_reported() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 2);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_width(children[0], 60.0).unwrap();
    tree.set_width(children[1], 60.0).unwrap();
    layout(&mut tree, root);

    assert!(tree.layout_had_overflow(root).unwrap());
    assert_eq!(tree.layout_left(children[1]).unwrap(), 60.0);

    tree.set_width(children[1], 40.0).unwrap();
    layout(&mut tree, root);
    assert!(!tree.layout_had_overflow(root).unwrap());
}

#[test]
fn test_justify_content_in_row() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 3);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    for &child in &children {
        tree.set_width(child, 10.0).unwrap();
    }

    tree.set_justify_content(root, Justify::SpaceBetween).unwrap();
    layout(&mut tree, root);
    let lefts: Vec<f32> = children.iter().map(|&c| tree.layout_left(c).unwrap()).collect();
    assert_eq!(lefts, vec![0.0, 45.0, 90.0]);

    tree.set_justify_content(root, Justify::Center).unwrap();
    layout(&mut tree, root);
    let lefts: Vec<f32> = children.iter().map(|&c| tree.layout_left(c).unwrap()).collect();
    assert_eq!(lefts, vec![35.0, 45.0, 55.0]);

    tree.set_justify_content(root, Justify::FlexEnd).unwrap();
    layout(&mut tree, root);
    assert_eq!(tree.layout_left(children[2]).unwrap(), 90.0);
}

#[test]
fn test_align_items_center() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 1);
    tree.set_align_items(root, Align::Center).unwrap();
    tree.set_width(children[0], 10.0).unwrap();
    tree.set_height(children[0], 10.0).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (45.0, 0.0, 10.0, 10.0));
}

#[test]
fn test_align_self_overrides_align_items() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 1);
    tree.set_align_items(root, Align::Center).unwrap();
    tree.set_align_self(children[0], Align::FlexEnd).unwrap();
    tree.set_width(children[0], 10.0).unwrap();
    tree.set_height(children[0], 10.0).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (90.0, 0.0, 10.0, 10.0));
}

#[test]
fn test_padding_and_margin_inset_children() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 1);
    tree.set_padding(root, Edge::All, 10.0).unwrap();
    tree.set_margin(children[0], Edge::All, 5.0).unwrap();
    tree.set_flex_grow(children[0], 1.0).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (15.0, 15.0, 70.0, 70.0));
    assert_eq!(tree.layout_padding(root, LayoutEdge::Top).unwrap(), 10.0);
    assert_eq!(tree.layout_margin(children[0], LayoutEdge::Bottom).unwrap(), 5.0);
}

#[test]
fn test_auto_margins_center_item() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 1);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_width(children[0], 20.0).unwrap();
    tree.set_height(children[0], 20.0).unwrap();
    tree.set_margin_auto(children[0], Edge::Left).unwrap();
    tree.set_margin_auto(children[0], Edge::Right).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (40.0, 0.0, 20.0, 20.0));
}

#[test]
fn test_percentages_resolve_against_owner() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 200.0, 100.0, 1);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_width_percent(children[0], 50.0).unwrap();
    tree.set_height_percent(children[0], 50.0).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (0.0, 0.0, 100.0, 50.0));
}

#[test]
fn test_aspect_ratio_derives_missing_size() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 1);
    tree.set_align_items(root, Align::FlexStart).unwrap();
    tree.set_width(children[0], 50.0).unwrap();
    tree.set_aspect_ratio(children[0], 1.0).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (0.0, 0.0, 50.0, 50.0));
}

#[test]
fn test_display_none_takes_no_space() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 2);
    tree.set_display(children[0], Display::None).unwrap();
    tree.set_height(children[0], 50.0).unwrap();
    tree.set_height(children[1], 10.0).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (0.0, 0.0, 0.0, 0.0));
    assert_layout(&tree, children[1], (0.0, 0.0, 100.0, 10.0));
}

#[test]
fn test_absolute_children_use_insets() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 3);
    for &child in &children[..2] {
        tree.set_position_type(child, PositionType::Absolute).unwrap();
        tree.set_width(child, 10.0).unwrap();
        tree.set_height(child, 10.0).unwrap();
    }
    tree.set_position(children[0], Edge::Left, 10.0).unwrap();
    tree.set_position(children[0], Edge::Top, 10.0).unwrap();
    tree.set_position(children[1], Edge::Right, 10.0).unwrap();
    tree.set_position(children[1], Edge::Bottom, 10.0).unwrap();
    tree.set_height(children[2], 30.0).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (10.0, 10.0, 10.0, 10.0));
    assert_layout(&tree, children[1], (80.0, 80.0, 10.0, 10.0));
    // Out-of-flow siblings do not push in-flow ones.
    assert_layout(&tree, children[2], (0.0, 0.0, 100.0, 30.0));
}

#[test]
fn test_absolute_child_stretches_between_insets() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 1);
    tree.set_position_type(children[0], PositionType::Absolute).unwrap();
    tree.set_position(children[0], Edge::All, 20.0).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (20.0, 20.0, 60.0, 60.0));
}

#[test]
fn test_relative_offsets_shift_after_layout() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 1);
    tree.set_height(children[0], 10.0).unwrap();
    tree.set_position(children[0], Edge::Top, 5.0).unwrap();
    tree.set_position(children[0], Edge::Left, 7.0).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (7.0, 5.0, 100.0, 10.0));
}

#[test]
fn test_wrap_starts_new_line() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 3);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_flex_wrap(root, Wrap::Wrap).unwrap();
    for &child in &children {
        tree.set_width(child, 40.0).unwrap();
        tree.set_height(child, 10.0).unwrap();
    }
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (0.0, 0.0, 40.0, 10.0));
    assert_layout(&tree, children[1], (40.0, 0.0, 40.0, 10.0));
    assert_layout(&tree, children[2], (0.0, 10.0, 40.0, 10.0));
}

#[test]
fn test_wrap_reverse_flips_lines() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 3);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_flex_wrap(root, Wrap::WrapReverse).unwrap();
    for &child in &children {
        tree.set_width(child, 40.0).unwrap();
        tree.set_height(child, 10.0).unwrap();
    }
    layout(&mut tree, root);

    assert_eq!(tree.layout_top(children[0]).unwrap(), 90.0);
    assert_eq!(tree.layout_top(children[2]).unwrap(), 80.0);
}

#[test]
fn test_rtl_row_starts_on_the_right() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 1);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_width(children[0], 10.0).unwrap();
    tree.set_margin(children[0], Edge::Start, 10.0).unwrap();
    tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Rtl).unwrap();

    assert_eq!(tree.layout_direction(children[0]).unwrap(), Direction::Rtl);
    assert_eq!(tree.layout_left(children[0]).unwrap(), 80.0);
    assert_eq!(tree.layout_margin(children[0], LayoutEdge::Right).unwrap(), 10.0);
    assert_eq!(tree.layout_margin(children[0], LayoutEdge::Start).unwrap(), 10.0);
    assert_eq!(tree.layout_margin(children[0], LayoutEdge::Left).unwrap(), 0.0);
}

#[test]
fn test_row_reverse_places_first_child_last() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 2);
    tree.set_flex_direction(root, FlexDirection::RowReverse).unwrap();
    tree.set_width(children[0], 10.0).unwrap();
    tree.set_width(children[1], 20.0).unwrap();
    layout(&mut tree, root);

    assert_eq!(tree.layout_left(children[0]).unwrap(), 90.0);
    assert_eq!(tree.layout_left(children[1]).unwrap(), 70.0);
}

#[test]
fn test_rounding_snaps_edges_not_sizes() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 3);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    for &child in &children {
        tree.set_flex_grow(child, 1.0).unwrap();
    }
    layout(&mut tree, root);

    let boxes: Vec<(f32, f32)> = children
        .iter()
        .map(|&c| (tree.layout_left(c).unwrap(), tree.layout_width(c).unwrap()))
        .collect();
    assert_eq!(boxes, vec![(0.0, 33.0), (33.0, 34.0), (67.0, 33.0)]);
}

#[test]
fn test_zero_scale_keeps_raw_values() {
    let mut config = Config::new();
    config.set_point_scale_factor(0.0).unwrap();
    let mut tree = LayoutTree::with_config(config);
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 3);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    for &child in &children {
        tree.set_flex_grow(child, 1.0).unwrap();
    }
    layout(&mut tree, root);

    let left = tree.layout_left(children[1]).unwrap();
    assert!((left - 100.0 / 3.0).abs() < 0.001, "left was {}", left);
}

#[test]
fn test_measure_func_sizes_leaf() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 200.0, 100.0, 1);
    tree.set_align_items(root, Align::FlexStart).unwrap();
    tree.set_measure_func(children[0], Some(text_measure(5))).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (0.0, 0.0, 50.0, 10.0));
}

#[test]
fn test_measured_text_wraps_to_stretched_width() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 30.0, 100.0, 1);
    tree.set_measure_func(children[0], Some(text_measure(5))).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (0.0, 0.0, 30.0, 20.0));
}

#[test]
fn test_unchanged_tree_is_served_from_cache() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 2);
    let (measure, calls) = counting_measure(20.0, 20.0);
    tree.set_measure_func(children[1], Some(measure)).unwrap();
    layout(&mut tree, root);

    let first = tree.last_pass_stats();
    assert!(first.layouts > 0);
    assert!(tree.was_recomputed(root).unwrap());
    let measured = calls.load(Ordering::SeqCst);
    assert!(measured > 0);
    let before = tree.snapshot(root).unwrap();

    layout(&mut tree, root);
    let second = tree.last_pass_stats();
    assert_eq!(second.layouts, 0);
    assert_eq!(second.measures, 0);
    assert_eq!(second.measure_callbacks, 0);
    assert!(second.cache_hits() > 0);
    assert!(!tree.was_recomputed(root).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), measured);
    assert_eq!(tree.snapshot(root).unwrap(), before);
}

#[test]
fn test_dirty_leaf_is_measured_again() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 2);
    let (measure, calls) = counting_measure(20.0, 20.0);
    tree.set_measure_func(children[1], Some(measure)).unwrap();
    layout(&mut tree, root);
    let measured = calls.load(Ordering::SeqCst);

    tree.mark_dirty(children[1]).unwrap();
    layout(&mut tree, root);
    assert!(calls.load(Ordering::SeqCst) > measured);
    assert!(tree.was_recomputed(children[1]).unwrap());
    assert!(!tree.is_dirty(root).unwrap());
}

#[test]
fn test_owner_direction_change_relayouts() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 1);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_width(children[0], 10.0).unwrap();
    layout(&mut tree, root);
    assert_eq!(tree.layout_left(children[0]).unwrap(), 0.0);

    tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Rtl).unwrap();
    assert_eq!(tree.layout_left(children[0]).unwrap(), 90.0);
}

#[test]
fn test_align_items_baseline() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 2);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_align_items(root, Align::Baseline).unwrap();
    tree.set_width(children[0], 50.0).unwrap();
    tree.set_height(children[0], 50.0).unwrap();
    tree.set_width(children[1], 50.0).unwrap();
    tree.set_height(children[1], 20.0).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (0.0, 0.0, 50.0, 50.0));
    assert_layout(&tree, children[1], (50.0, 30.0, 50.0, 20.0));
}

#[test]
fn test_baseline_func_moves_item() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 2);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_align_items(root, Align::Baseline).unwrap();
    for &child in &children {
        tree.set_width(child, 50.0).unwrap();
        tree.set_height(child, 20.0).unwrap();
    }
    tree.set_baseline_func(children[0], Some(Arc::new(|_, height| height / 2.0))).unwrap();
    layout(&mut tree, root);

    assert_eq!(tree.layout_top(children[0]).unwrap(), 10.0);
    assert_eq!(tree.layout_top(children[1]).unwrap(), 0.0);
}

#[test]
fn test_nan_baseline_is_an_error() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 1);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_align_items(root, Align::Baseline).unwrap();
    tree.set_height(children[0], 10.0).unwrap();
    tree.set_baseline_func(children[0], Some(Arc::new(|_, _| f32::NAN))).unwrap();

    let err = tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr).unwrap_err();
    assert_eq!(err, LayoutError::BaselineIsNaN(children[0]));
}

#[test]
fn test_nan_measurement_is_an_error() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 1);
    tree.set_align_items(root, Align::FlexStart).unwrap();
    tree.set_measure_func(children[0], Some(Arc::new(|_, _, _, _| Size::undefined()))).unwrap();

    let err = tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr).unwrap_err();
    assert_eq!(
        err,
        LayoutError::MeasureReturnedNaN {
            node: children[0],
            axis: "width"
        }
    );
}

#[test]
fn test_exact_measurement_skips_measure_func() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 1);
    tree.set_height(children[0], 30.0).unwrap();
    let (measure, calls) = counting_measure(5.0, 5.0);
    tree.set_measure_func(children[0], Some(measure)).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (0.0, 0.0, 100.0, 30.0));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_legacy_stretch_difference_is_recorded() {
    let mut config = Config::new();
    config.use_legacy_stretch_behaviour = true;
    config.should_diff_layout_without_legacy_stretch_behaviour = true;
    let mut tree = LayoutTree::with_config(config);
    let root = tree.new_node();
    tree.set_width(root, 100.0).unwrap();
    tree.set_max_height(root, 100.0).unwrap();
    let child = tree.new_node();
    tree.set_flex_grow(child, 1.0).unwrap();
    tree.add_child(root, child).unwrap();
    layout(&mut tree, root);

    let results = tree.layout_results(root).unwrap();
    assert!(results.did_use_legacy_flag);
    assert!(results.does_legacy_stretch_flag_affect_layout);
    assert_eq!(tree.layout_height(child).unwrap(), 100.0);
    // The comparison copy is discarded.
    assert_eq!(tree.node_count(), 2);
}

#[test]
fn test_without_legacy_stretch_container_hugs_content() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_width(root, 100.0).unwrap();
    tree.set_max_height(root, 100.0).unwrap();
    let child = tree.new_node();
    tree.set_flex_grow(child, 1.0).unwrap();
    tree.add_child(root, child).unwrap();
    layout(&mut tree, root);

    assert_eq!(tree.layout_height(root).unwrap(), 0.0);
    assert_eq!(tree.layout_height(child).unwrap(), 0.0);
    assert!(!tree.layout_results(root).unwrap().did_use_legacy_flag);
}

#[test]
fn test_nested_containers_size_to_content() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    let row = tree.new_node();
    tree.set_flex_direction(row, FlexDirection::Row).unwrap();
    tree.add_child(root, row).unwrap();
    for width in [30.0, 40.0] {
        let leaf = tree.new_node();
        tree.set_measure_func(leaf, Some(fixed_measure(width, 15.0))).unwrap();
        tree.add_child(row, leaf).unwrap();
    }
    layout(&mut tree, root);

    assert_layout(&tree, root, (0.0, 0.0, 70.0, 15.0));
    assert_layout(&tree, row, (0.0, 0.0, 70.0, 15.0));
    let second = tree.child(row, 1).unwrap().unwrap();
    assert_layout(&tree, second, (30.0, 0.0, 40.0, 15.0));
}

#[test]
fn test_negative_offsets_round_to_nearest_pixel() {
    let mut tree = LayoutTree::new();
    let (root, children) = root_with_children(&mut tree, 100.0, 100.0, 1);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_width(children[0], 20.0).unwrap();
    tree.set_height(children[0], 20.0).unwrap();
    tree.set_margin(children[0], Edge::Left, -10.6).unwrap();
    layout(&mut tree, root);

    assert_layout(&tree, children[0], (-11.0, 0.0, 20.0, 20.0));
}

#[test]
fn test_negative_root_max_size_is_not_a_bound() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_max_width(root, -10.0).unwrap();
    tree.calculate_layout(root, 100.0, 50.0, Direction::Ltr).unwrap();

    assert_layout(&tree, root, (0.0, 0.0, 100.0, 50.0));
}
