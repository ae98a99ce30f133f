//! Text output formatter

use coffeelint_core::AnnotationOutcome;

use super::FileReport;

pub fn output_text(reports: &[FileReport]) {
    let mut total_issues = 0;
    let mut failures = 0;

    for report in reports {
        match &report.outcome {
            AnnotationOutcome::Annotated(annotations) if !annotations.is_empty() => {
                println!("\n{}:", report.path.display());
                for annotation in annotations {
                    println!(
                        "  {}:{} {} [{}]: {}",
                        annotation.line + 1,
                        annotation.column,
                        annotation.severity.as_str(),
                        annotation.source,
                        annotation.message
                    );
                }
                total_issues += annotations.len();
            }
            AnnotationOutcome::Failed(message) => {
                println!("\n{}:", report.path.display());
                for line in message.trim().lines() {
                    println!("  failed: {}", line);
                }
                failures += 1;
            }
            _ => {}
        }
    }

    println!();
    if failures > 0 {
        println!(
            "Checked {} files, found {} issues, {} failed",
            reports.len(),
            total_issues,
            failures
        );
    } else {
        println!(
            "Checked {} files, found {} issues",
            reports.len(),
            total_issues
        );
    }
}
