//! Terminal rendering for transcript entries, notices and backend payloads.

use colored::{ColoredString, Colorize};
use lexrag_core::analysis::{Clause, ComparisonReport, RiskLevel};
use lexrag_core::library::DocumentRef;
use lexrag_core::message::{Message, MessageRole};
use lexrag_core::notice::{Notice, NoticeLevel};
use tokio::sync::mpsc::UnboundedReceiver;

pub fn message(message: &Message) {
    match message.role {
        MessageRole::User => println!("{}", format!("> {}", message.content).green()),
        MessageRole::Assistant => {
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
            if !message.citations.is_empty() {
                println!(
                    "{}",
                    format!("  Sources: {}", message.citations.join(", ")).bright_black()
                );
            }
        }
    }
}

pub fn notice(notice: &Notice) {
    let line = if notice.description.is_empty() {
        notice.title.clone()
    } else {
        format!("{}: {}", notice.title, notice.description)
    };
    match notice.level {
        NoticeLevel::Info => println!("{}", line.bright_black()),
        NoticeLevel::Success => println!("{}", line.bright_green()),
        NoticeLevel::Error => eprintln!("{}", line.red()),
    }
}

/// Prints every notice queued so far without waiting for more.
pub fn drain_notices(rx: &mut UnboundedReceiver<Notice>) {
    while let Ok(queued) = rx.try_recv() {
        notice(&queued);
    }
}

pub fn documents(documents: &[DocumentRef]) {
    if documents.is_empty() {
        println!("{}", "No documents uploaded yet.".bright_black());
        return;
    }
    println!("{}", format!("{} document(s):", documents.len()).bold());
    for doc in documents {
        println!("  {}", doc.name);
    }
}

fn risk(level: RiskLevel) -> ColoredString {
    let label = level.as_str().to_uppercase();
    match level {
        RiskLevel::Low => label.green(),
        RiskLevel::Medium => label.yellow(),
        RiskLevel::High => label.red(),
    }
}

pub fn clauses(document: &str, clauses: &[Clause]) {
    if clauses.is_empty() {
        println!("{}", format!("No clauses found in {document}.").bright_black());
        return;
    }
    println!("{}", format!("Clauses in {document}:").bold());
    for clause in clauses {
        println!(
            "  [{}] {} ({}, page {})",
            risk(clause.risk),
            clause.clause_type.bright_magenta(),
            clause.section,
            clause.page
        );
        println!("      {}", clause.content);
    }
}

pub fn comparison(report: &ComparisonReport) {
    println!(
        "{} {}/100 ({})",
        "Risk score:".bold(),
        report.risk_score,
        risk(report.risk_level())
    );
    if report.differences.is_empty() {
        println!("{}", "No differences found.".bright_black());
        return;
    }
    for diff in &report.differences {
        println!(
            "  [{}] {} ({:?})",
            risk(diff.risk),
            diff.clause.bright_magenta(),
            diff.kind
        );
        println!("      first:  {}", diff.doc1_value);
        println!("      second: {}", diff.doc2_value);
    }
}
