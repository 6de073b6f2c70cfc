//! Tests for the dataframe HTML table writer.

use notebook_display::{Column, DataFrame, DisplayOptions, HtmlOptions, ShowDimensions, Value};
use raster_common::RasterError;

// ============================================================================
// Helper functions
// ============================================================================

fn numbers(rows: i64, cols: usize) -> DataFrame {
    DataFrame::new(
        (0..cols)
            .map(|c| Column::new(format!("c{}", c), (0..rows).map(|r| r * 10 + c as i64)))
            .collect(),
    )
    .unwrap()
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_plain_table_layout() {
    let frame = DataFrame::new(vec![Column::new("a", [1i64]), Column::new("b", ["x"])]).unwrap();
    let html = frame.to_html(&HtmlOptions::default()).unwrap();

    let expected = "<table border=\"1\" class=\"dataframe\">\n  <thead>\n    <tr style=\"text-align: right;\">\n      <th></th>\n      <th>a</th>\n      <th>b</th>\n    </tr>\n  </thead>\n  <tbody>\n    <tr>\n      <th>0</th>\n      <td>1</td>\n      <td>x</td>\n    </tr>\n  </tbody>\n</table>\n";
    assert_eq!(html, expected);
}

#[test]
fn test_notebook_wrapper() {
    let options = HtmlOptions {
        notebook: true,
        ..Default::default()
    };
    let html = numbers(1, 1).to_html(&options).unwrap();
    assert!(html.starts_with("<div>\n<style scoped>"));
    assert!(html.ends_with("</table>\n</div>"));
}

#[test]
fn test_extra_classes() {
    let options = HtmlOptions {
        classes: vec!["tiles".to_string()],
        border: 0,
        ..Default::default()
    };
    let html = numbers(1, 1).to_html(&options).unwrap();
    assert!(html.starts_with("<table border=\"0\" class=\"dataframe tiles\">"));
}

// ============================================================================
// Cell text
// ============================================================================

#[test]
fn test_escaping() {
    let frame = DataFrame::new(vec![Column::new("<h>", ["a & <b>"])]).unwrap();

    let escaped = frame.to_html(&HtmlOptions::default()).unwrap();
    assert!(escaped.contains("<th>&lt;h&gt;</th>"));
    assert!(escaped.contains("<td>a &amp; &lt;b&gt;</td>"));

    let raw = frame
        .to_html(&HtmlOptions {
            escape: false,
            ..Default::default()
        })
        .unwrap();
    assert!(raw.contains("<td>a & <b></td>"));
}

#[test]
fn test_links_only_when_enabled() {
    let frame = DataFrame::new(vec![Column::new("u", ["https://example.com"])]).unwrap();

    let plain = frame.to_html(&HtmlOptions::default()).unwrap();
    assert!(plain.contains("<td>https://example.com</td>"));

    let linked = frame
        .to_html(&HtmlOptions {
            render_links: true,
            ..Default::default()
        })
        .unwrap();
    assert!(linked.contains("<a href=\"https://example.com\" target=\"_blank\">"));
}

#[test]
fn test_colwidth_truncation() {
    let frame = DataFrame::new(vec![Column::new("s", ["abcdefghijklmnop"])]).unwrap();
    let options = HtmlOptions {
        max_colwidth: Some(10),
        ..Default::default()
    };
    let html = frame.to_html(&options).unwrap();
    assert!(html.contains("<td>abcdefg...</td>"));
}

#[test]
fn test_formatter_output_is_truncated_too() {
    let frame = DataFrame::new(vec![Column::new("n", [1i64])]).unwrap();
    let options = HtmlOptions {
        max_colwidth: Some(8),
        escape: false,
        ..Default::default()
    }
    .with_formatter("n", |v| Ok(format!("<i>{}</i> long", v)));
    let html = frame.to_html(&options).unwrap();
    assert!(html.contains("<td><i>1<...</td>"));
}

#[test]
fn test_formatter_error_propagates() {
    let frame = DataFrame::new(vec![Column::new("n", [1i64])]).unwrap();
    let options = HtmlOptions::default()
        .with_formatter("n", |_| Err(RasterError::RenderError("boom".to_string())));
    assert!(matches!(
        frame.to_html(&options),
        Err(RasterError::RenderError(_))
    ));
}

#[test]
fn test_value_reprs_in_cells() {
    let frame = DataFrame::new(vec![Column::new(
        "v",
        vec![Value::Null, Value::Bool(true), Value::Float(1.0), Value::Float(f64::NAN)],
    )])
    .unwrap();
    let html = frame.to_html(&HtmlOptions::default()).unwrap();
    for cell in ["null", "true", "1.0", "NaN"] {
        assert!(html.contains(&format!("<td>{}</td>", cell)), "missing {}", cell);
    }
}

// ============================================================================
// Truncation
// ============================================================================

#[test]
fn test_row_truncation_keeps_head_and_tail() {
    let options = HtmlOptions {
        max_rows: Some(4),
        ..Default::default()
    };
    let html = numbers(10, 1).to_html(&options).unwrap();

    for shown in ["<th>0</th>", "<th>1</th>", "<th>8</th>", "<th>9</th>"] {
        assert!(html.contains(shown), "missing {}", shown);
    }
    assert!(!html.contains("<th>5</th>"));
    assert_eq!(html.matches("<th>...</th>").count(), 1);
}

#[test]
fn test_column_truncation() {
    let options = HtmlOptions {
        max_cols: Some(2),
        ..Default::default()
    };
    let html = numbers(2, 5).to_html(&options).unwrap();

    assert!(html.contains("<th>c0</th>"));
    assert!(html.contains("<th>c4</th>"));
    assert!(!html.contains("<th>c2</th>"));
    // header + two body rows
    assert_eq!(html.matches("<th>...</th>").count(), 1);
    assert_eq!(html.matches("<td>...</td>").count(), 2);
}

#[test]
fn test_dimensions_footer() {
    let truncated = HtmlOptions {
        max_rows: Some(2),
        show_dimensions: ShowDimensions::Truncate,
        ..Default::default()
    };
    assert!(numbers(5, 2)
        .to_html(&truncated)
        .unwrap()
        .contains("<p>5 rows × 2 columns</p>"));

    let fits = HtmlOptions {
        show_dimensions: ShowDimensions::Truncate,
        ..Default::default()
    };
    assert!(!numbers(5, 2).to_html(&fits).unwrap().contains("<p>"));

    let never = HtmlOptions {
        max_rows: Some(2),
        show_dimensions: ShowDimensions::Never,
        ..Default::default()
    };
    assert!(!numbers(5, 2).to_html(&never).unwrap().contains("<p>"));
}

#[test]
fn test_from_display_options() {
    let display = DisplayOptions {
        max_rows: Some(3),
        max_columns: None,
        max_colwidth: Some(5),
        show_dimensions: ShowDimensions::Always,
        ..Default::default()
    };
    let options = HtmlOptions::from_display(&display);
    assert_eq!(options.max_rows, Some(3));
    assert_eq!(options.max_cols, None);
    assert_eq!(options.max_colwidth, Some(5));
    assert!(options.escape);
}
