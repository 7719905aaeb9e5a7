use anyhow::Result;
use artist_tracker::config::Config;
use artist_tracker::pipeline::assemble::build_records;
use artist_tracker::pipeline::diff::{diff, render_message};
use artist_tracker::pipeline::extract::{ExtractRules, RejectReason, TableExtractor};
use artist_tracker::pipeline::snapshot;
use artist_tracker::types::{Change, Field, Record, Snapshot};
use tempfile::tempdir;

const HEADER: &str = "<tr><td>Artist Tracker</td></tr>\
    <tr><td>Legend</td></tr>\
    <tr><td>Name</td><td>Credit</td><td>Updated</td><td>Links</td></tr>";

fn row(label: &str, href: &str, credit: &str, updated: &str, links: &str) -> String {
    format!(
        "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>",
        href, label, credit, updated, links
    )
}

fn sheet(rows: &[String]) -> Vec<u8> {
    format!(
        "<html><body><table class=\"waffle\"><tbody>{}{}</tbody></table></body></html>",
        HEADER,
        rows.join("")
    )
    .into_bytes()
}

fn first_sheet() -> Vec<u8> {
    sheet(&[
        row("⭐ Kanye West", "https://trackerhub.cx/ye", "Alice", "Jan 1", "Yes"),
        row("Drake", "https://trackerhub.cx/drake", "Bob", "Jan 2", "Yes"),
        row("AI Models", "https://trackerhub.cx/ai", "", "", ""),
        row("🤖 Synth Singer", "https://trackerhub.cx/synth", "Carol", "Jan 3", "No"),
        row("🎹 BPM & Key Tracker", "https://trackerhub.cx/bpm", "", "", ""),
        row("Leaked 🚩", "https://trackerhub.cx/leak", "", "", ""),
    ])
}

fn override_record(identity: &str) -> Record {
    Record {
        identity: identity.to_string(),
        link: format!("https://curated.test/{}", identity.to_lowercase()),
        credit: "Curated".to_string(),
        availability: "Yes".to_string(),
        last_updated: "Manual".to_string(),
        featured: false,
    }
}

#[test]
fn sheet_becomes_sorted_records() -> Result<()> {
    let extractor = TableExtractor::default();
    let records = build_records(&extractor, &[], &first_sheet())?;

    let names: Vec<&str> = records.iter().map(|r| r.identity.as_str()).collect();
    assert_eq!(names, vec!["Drake", "Kanye West", "Synth Singer"]);
    assert!(records[0].featured && records[1].featured);
    assert!(!records[2].featured);
    assert_eq!(records[1].credit, "Alice");
    assert_eq!(records[1].last_updated, "Jan 1");
    assert_eq!(records[1].availability, "Yes");
    Ok(())
}

#[test]
fn rejected_rows_are_tallied_by_reason() -> Result<()> {
    let extractor = TableExtractor::new(ExtractRules::default());
    let html = String::from_utf8(first_sheet())?;
    let extraction = extractor.extract_html(&html)?;

    assert_eq!(extraction.rejected_count(RejectReason::HeaderRow), 3);
    assert_eq!(extraction.rejected_count(RejectReason::Excluded), 2);
    assert_eq!(extraction.rejected_count(RejectReason::FlaggedLabel), 1);
    assert_eq!(extraction.records.len(), 3);
    Ok(())
}

#[test]
fn only_header_rows_yield_nothing() -> Result<()> {
    let records = build_records(&TableExtractor::default(), &[], &sheet(&[]))?;
    assert!(records.is_empty());
    Ok(())
}

#[test]
fn overrides_fill_gaps_without_duplicating_sheet_rows() -> Result<()> {
    let overrides = vec![override_record("Drake"), override_record("Frank Ocean"), override_record("Frank Ocean")];
    let records = build_records(&TableExtractor::default(), &overrides, &first_sheet())?;

    let names: Vec<&str> = records.iter().map(|r| r.identity.as_str()).collect();
    assert_eq!(names, vec!["Drake", "Kanye West", "Frank Ocean", "Synth Singer"]);
    let drake = &records[0];
    assert_eq!(drake.credit, "Bob");
    Ok(())
}

#[test]
fn missing_table_is_an_error() {
    let html = b"<html><body><p>Sign in to continue</p></body></html>";
    assert!(build_records(&TableExtractor::default(), &[], html).is_err());
}

#[test]
fn saved_snapshot_reloads_and_diffs_against_next_sheet() -> Result<()> {
    let dir = tempdir()?;
    let csv_path = dir.path().join("artists.csv");
    let extractor = TableExtractor::default();

    let before = build_records(&extractor, &[], &first_sheet())?;
    let bytes = snapshot::save(&csv_path, &before)?;
    let text = String::from_utf8(bytes)?;
    assert!(text.starts_with("\"Artist Name\",\"URL\",\"Credit\",\"Links Work\",\"Updated\",\"Best\"\n"));
    assert!(text.contains("\"Kanye West\",\"https://trackerhub.cx/ye\",\"Alice\",\"Yes\",\"Jan 1\",\"Yes\"\n"));

    let old = snapshot::load(&csv_path);
    assert_eq!(old, before.iter().cloned().collect::<Snapshot>());

    let next = sheet(&[
        row("⭐ Kanye West", "https://trackerhub.cx/ye2", "Alice", "Jan 1", "Yes"),
        row("AI Models", "https://trackerhub.cx/ai", "", "", ""),
        row("🤖 Synth Singer", "https://trackerhub.cx/synth", "Carol", "Feb 3", "No"),
        row("Tyler", "https://trackerhub.cx/tyler", "Dan", "Feb 4", "Yes"),
    ]);
    let after: Snapshot = build_records(&extractor, &[], &next)?.into_iter().collect();

    let delta = diff(&old, &after);
    assert_eq!(
        delta,
        vec![
            Change::Removed("Drake".to_string()),
            Change::Added("Tyler".to_string()),
            Change::FieldChanged("Kanye West".to_string(), Field::Link),
            Change::FieldChanged("Synth Singer".to_string(), Field::LastUpdated),
        ]
    );

    let message = render_message(&delta);
    assert_eq!(
        message,
        "**Tracker Update Detected:**\n\
         ❌ Removed: **Drake**\n\
         ➕ Added: **Tyler**\n\
         🔗 Link changed for **Kanye West**\n\
         🕒 Updated date changed for **Synth Singer**"
    );
    Ok(())
}

#[test]
fn featured_move_across_section_is_reported() -> Result<()> {
    let extractor = TableExtractor::default();
    let old: Snapshot = build_records(&extractor, &[], &first_sheet())?.into_iter().collect();
    let moved = sheet(&[
        row("⭐ Kanye West", "https://trackerhub.cx/ye", "Alice", "Jan 1", "Yes"),
        row("AI Models", "https://trackerhub.cx/ai", "", "", ""),
        row("Drake", "https://trackerhub.cx/drake", "Bob", "Jan 2", "Yes"),
        row("🤖 Synth Singer", "https://trackerhub.cx/synth", "Carol", "Jan 3", "No"),
    ]);
    let new: Snapshot = build_records(&extractor, &[], &moved)?.into_iter().collect();

    assert_eq!(diff(&old, &new), vec![Change::FieldChanged("Drake".to_string(), Field::Featured)]);
    Ok(())
}

#[test]
fn diff_partitions_identities() -> Result<()> {
    let extractor = TableExtractor::default();
    let old: Snapshot = build_records(&extractor, &[], &first_sheet())?.into_iter().collect();
    let new: Snapshot = build_records(&extractor, &[override_record("Frank Ocean")], &sheet(&[]))?
        .into_iter()
        .collect();

    let delta = diff(&old, &new);
    for change in &delta {
        let id = change.identity();
        match change {
            Change::Removed(_) => assert!(old.contains(id) && !new.contains(id)),
            Change::Added(_) => assert!(new.contains(id) && !old.contains(id)),
            Change::FieldChanged(_, _) => assert!(old.contains(id) && new.contains(id)),
        }
    }
    assert_eq!(delta.len(), old.len() + new.len());
    assert!(diff(&new, &new).is_empty());
    Ok(())
}

#[test]
fn configured_rules_drive_extraction() -> Result<()> {
    let mut config = Config::default();
    config.extract.exclude.push("Drake".to_string());
    let extractor = TableExtractor::new(ExtractRules::from_config(&config.extract));
    let records = build_records(&extractor, &[], &first_sheet())?;
    assert!(records.iter().all(|r| r.identity != "Drake"));
    Ok(())
}
