//! Checkstyle report parser.
//!
//! CoffeeLint's `--reporter checkstyle` prints a document of the form:
//!
//! ```xml
//! <checkstyle version="4.3">
//!   <file name="a.coffee">
//!     <error line="3" column="2" severity="error" message="..." source="..."/>
//!   </file>
//! </checkstyle>
//! ```
//!
//! Only the first `file` element is used. Unknown elements are skipped.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::warn;

use crate::error::LinterError;
use crate::report::{Issue, Report, ReportFile, Severity};

const ROOT: &[u8] = b"checkstyle";
const FILE: &[u8] = b"file";
const ERROR: &[u8] = b"error";

/// Parses checkstyle XML into a [`Report`].
pub fn parse_report(xml: &str) -> Result<Report, LinterError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut report: Option<Report> = None;
    let mut stack: Vec<Vec<u8>> = Vec::new();
    // Whether the `file` element currently open is the one being collected.
    let mut collecting = false;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(LinterError::malformed(format!(
                    "{} at byte {}",
                    e,
                    reader.error_position()
                )));
            }
        };

        match event {
            Event::Start(e) => {
                open_element(&e, &stack, &mut report, &mut collecting)?;
                stack.push(e.name().as_ref().to_vec());
            }
            Event::Empty(e) => {
                open_element(&e, &stack, &mut report, &mut collecting)?;
                close_element(stack.len(), e.name().as_ref(), &mut collecting);
            }
            Event::End(_) => {
                if let Some(name) = stack.pop() {
                    close_element(stack.len(), &name, &mut collecting);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(LinterError::malformed(format!(
            "unexpected end of input inside <{}>",
            String::from_utf8_lossy(stack.last().map(Vec::as_slice).unwrap_or_default())
        )));
    }

    report.ok_or_else(|| LinterError::malformed("missing <checkstyle> root element"))
}

fn open_element(
    element: &BytesStart<'_>,
    stack: &[Vec<u8>],
    report: &mut Option<Report>,
    collecting: &mut bool,
) -> Result<(), LinterError> {
    let name = element.name();
    let name = name.as_ref();

    match stack.len() {
        0 => {
            if name != ROOT {
                return Err(LinterError::malformed(format!(
                    "expected <checkstyle> root, found <{}>",
                    String::from_utf8_lossy(name)
                )));
            }
            if report.is_some() {
                return Err(LinterError::malformed("multiple root elements"));
            }
            *report = Some(Report {
                version: attribute(element, b"version")?,
                file: None,
            });
        }
        1 if name == FILE => {
            let Some(report) = report.as_mut() else {
                return Ok(());
            };
            if report.file.is_some() {
                warn!("Checkstyle report has more than one <file>; ignoring extra sections");
                return Ok(());
            }
            report.file = Some(ReportFile {
                name: attribute(element, b"name")?.unwrap_or_default(),
                issues: Vec::new(),
            });
            *collecting = true;
        }
        2 if *collecting && name == ERROR => {
            let issue = parse_issue(element)?;
            if let Some(file) = report.as_mut().and_then(|r| r.file.as_mut()) {
                file.issues.push(issue);
            }
        }
        _ => {}
    }

    Ok(())
}

/// `depth` is the number of ancestors of the element being closed.
fn close_element(depth: usize, name: &[u8], collecting: &mut bool) {
    if depth == 1 && name == FILE {
        *collecting = false;
    }
}

fn parse_issue(element: &BytesStart<'_>) -> Result<Issue, LinterError> {
    Ok(Issue {
        source: attribute(element, b"source")?.unwrap_or_default(),
        line: integer_attribute(element, b"line")?,
        column: integer_attribute(element, b"column")?,
        severity: Severity::from_attribute(attribute(element, b"severity")?.as_deref()),
        message: attribute(element, b"message")?.unwrap_or_default(),
    })
}

fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, LinterError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| LinterError::malformed(e.to_string()))?;
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|e| LinterError::malformed(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn integer_attribute(element: &BytesStart<'_>, key: &[u8]) -> Result<i32, LinterError> {
    match attribute(element, key)? {
        None => Ok(0),
        Some(value) => value.trim().parse().map_err(|_| {
            LinterError::malformed(format!(
                "attribute '{}' is not an integer: {:?}",
                String::from_utf8_lossy(key),
                value
            ))
        }),
    }
}
