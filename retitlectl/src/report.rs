use retitle_core::{
    BatchSummary, IdentifierOverride, ItemError, ItemReport, NoiseWords,
    detect_override, extract_year, has_standard_tag, normalize,
};

pub fn print_item(result: &Result<ItemReport, ItemError>) {
    match result {
        Ok(report) => print_report(report),
        Err(err) => {
            println!("File: {}", err.path().display());
            println!("  Error ({}): {err}", err.stage());
            println!();
        }
    }
}

fn print_report(report: &ItemReport) {
    let record = &report.record;
    println!("File: {}", report.path.display());
    println!(
        "  Cleaned title: {} (year: {})",
        report.normalized_title,
        display_year(report.filename_year.map(|y| y.get()))
    );
    println!(
        "  Canonical: {} (year: {}) {}",
        record.title,
        display_year(record.year.map(|y| y.get())),
        record.ids
    );

    let decision = &report.decision;
    match decision.score {
        Some(score) => println!(
            "  Score: {score:.2}  Decision: {} ({})",
            decision.action, decision.reason
        ),
        None => println!(
            "  Decision: {} ({})",
            decision.action, decision.reason
        ),
    }
    if let Some(name) = &decision.proposed_name {
        println!("  Proposed: {name}");
    }

    if let Some(outcome) = &report.outcome {
        match &outcome.detail {
            Some(detail) => println!(
                "  Outcome: {} -> {} ({detail})",
                outcome.status,
                outcome.new_path.display()
            ),
            None => println!(
                "  Outcome: {} -> {}",
                outcome.status,
                outcome.new_path.display()
            ),
        }
    }
    println!();
}

pub fn print_summary(summary: &BatchSummary, dry_run: bool) {
    println!(
        "Processed {} item(s){}",
        summary.total,
        if dry_run { " (dry run, nothing renamed)" } else { "" }
    );
    println!(
        "  decisions: {} auto, {} ask, {} skip",
        summary.auto_rename, summary.ask_confirm, summary.skipped
    );
    println!(
        "  outcomes:  {} renamed, {} already correct, {} destination exists, {} declined, {} failed",
        summary.renamed,
        summary.already_correct,
        summary.skipped_exists,
        summary.declined,
        summary.failed
    );
    println!("  errors:    {}", summary.errors);
}

pub fn print_inspection(raw: &str, noise: &NoiseWords) {
    let normalized = normalize(raw, noise);
    let year = extract_year(raw).map(|y| y.get());
    let marker = match detect_override(raw) {
        Some(IdentifierOverride::Explicit(id)) => format!("tmdb {id}"),
        Some(IdentifierOverride::Marker) => "marker without id".to_string(),
        None => "none".to_string(),
    };

    println!("{raw}");
    println!("  normalized: {normalized}");
    println!("  year:       {}", display_year(year));
    println!("  tagged:     {}", if has_standard_tag(raw) { "yes" } else { "no" });
    println!("  override:   {marker}");
}

fn display_year(year: Option<u16>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "N/A".to_string())
}
