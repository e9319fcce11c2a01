use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::parser::ParseError;

/// Render a sentence parse failure with ariadne, pointing at the first bad token.
pub fn render_parse_error(filename: &str, error: &ParseError) -> String {
    let mut output = Vec::new();
    let span = (filename, error.span.clone());

    let written = Report::build(ReportKind::Error, span.clone())
        .with_message(format!("cannot parse {} sentence", error.family))
        .with_label(Label::new(span).with_message(&error.message).with_color(Color::Red))
        .finish()
        .write((filename, Source::from(error.text.as_str())), &mut output);

    match written {
        Ok(()) => String::from_utf8_lossy(&output).into_owned(),
        Err(_) => error.to_string(),
    }
}
