#![cfg(unix)]

// Full scans over fixture machines: merge precedence, categorization and
// the query surface.
mod support;

use anyhow::Result;
use appdeck::{
    ALL_SCOPE, CatalogStore, OTHER_CATEGORY, PageError, Provenance, Scope, paginate, scan,
    scan_with_report,
};
use std::collections::BTreeSet;
use support::Fixture;

fn sample_machine() -> Result<Fixture> {
    let fx = Fixture::new()?;
    fx.app("apps", "firefox.desktop", "Firefox", "firefox %u", "Web Browser")?;
    fx.app("apps", "code.desktop", "code", "/usr/share/code/code --unity", "Code Editing. Redefined.")?;
    fx.app("apps", "steam.desktop", "Steam", "steam", "Application for managing games")?;
    fx.descriptor(
        "apps",
        "hidden.desktop",
        "[Desktop Entry]\nName=Hidden Helper\nExec=helper\nNoDisplay=true\n",
    )?;
    for name in ["firefox", "code", "nmap", "htop", "zzzutil", "wget"] {
        fx.executable("bin", name)?;
    }
    Ok(fx)
}

#[test]
fn catalog_invariants_hold() -> Result<()> {
    let fx = sample_machine()?;
    let config = fx.config(&["apps"], &["bin"]);
    let catalog = scan(&config);

    let mut names = BTreeSet::new();
    for entry in catalog.all() {
        assert!(names.insert(entry.name.clone()), "duplicate {}", entry.name);
        assert!(!entry.command.is_empty());
        assert!(config.taxonomy.contains(&entry.category));
    }
    // 3 visible descriptors + 6 executables - "code" collision.
    assert_eq!(catalog.len(), 8);
    assert!(catalog.find("Hidden Helper").is_none());
    Ok(())
}

#[test]
fn manifest_entry_wins_identical_name() -> Result<()> {
    let fx = sample_machine()?;
    let catalog = scan(&fx.config(&["apps"], &["bin"]));

    let code = catalog.find("code").expect("code entry present");
    assert_eq!(code.provenance, Provenance::Manifest);
    assert_eq!(code.command, "/usr/share/code/code");
    assert_eq!(code.description, "Code Editing. Redefined.");
    assert_eq!(code.category, "Programming");
    Ok(())
}

#[test]
fn names_differing_in_case_are_both_kept() -> Result<()> {
    let fx = sample_machine()?;
    let catalog = scan(&fx.config(&["apps"], &["bin"]));

    let desktop = catalog.find("Firefox").expect("descriptor entry");
    let cli = catalog.find("firefox").expect("path entry");
    assert_eq!(desktop.provenance, Provenance::Manifest);
    assert_eq!(cli.provenance, Provenance::PathScan);
    assert_eq!(desktop.category, "Internet");
    assert_eq!(cli.category, "Internet");

    let internet: Vec<_> = catalog
        .category("Internet")
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(internet, vec!["Firefox", "firefox", "wget"]);
    Ok(())
}

#[test]
fn keyword_categories_follow_declared_order() -> Result<()> {
    let fx = sample_machine()?;
    let catalog = scan(&fx.config(&["apps"], &["bin"]));

    assert_eq!(catalog.find("nmap").unwrap().category, "Security");
    assert_eq!(catalog.find("htop").unwrap().category, "System");
    assert_eq!(catalog.find("Steam").unwrap().category, "Games");
    assert_eq!(catalog.find("zzzutil").unwrap().category, OTHER_CATEGORY);
    Ok(())
}

#[test]
fn rescans_are_deterministic() -> Result<()> {
    let fx = sample_machine()?;
    let config = fx.config(&["apps"], &["bin"]);
    assert_eq!(scan(&config), scan(&config));
    Ok(())
}

#[test]
fn listing_searching_and_paging() -> Result<()> {
    let fx = sample_machine()?;
    let catalog = scan(&fx.config(&["apps"], &["bin"]));

    let listed = catalog.list_categories();
    assert_eq!(listed[0].name, ALL_SCOPE);
    assert_eq!(listed[0].count, catalog.len());
    assert!(listed.iter().all(|s| s.count > 0));

    let all = catalog.search(&Scope::All, "");
    assert_eq!(all.len(), catalog.len());

    let hits = catalog.search(&Scope::All, "TOOL");
    assert!(!hits.is_empty());
    assert!(hits.iter().all(|e| e.matches("tool")));
    assert!(hits.iter().all(|e| e.provenance == Provenance::PathScan));

    let entries = catalog.all();
    for index in 0..3 {
        let page = paginate(entries, 3, index)?;
        assert!(page.items.len() <= 3);
        assert_eq!(page.total_pages, 3);
    }
    assert!(paginate(entries, 3, 5)?.items.is_empty());
    assert_eq!(paginate(entries, 0, 0).unwrap_err(), PageError::ZeroPageSize);
    Ok(())
}

#[test]
fn empty_machine_yields_empty_catalog() -> Result<()> {
    let fx = Fixture::new()?;
    let outcome = scan_with_report(&fx.config(&["nothing-here"], &["nor-here"]));
    assert!(outcome.catalog.is_empty());
    assert_eq!(outcome.report.merged_entries, 0);
    assert!(outcome.report.issues.is_empty());
    Ok(())
}

#[test]
fn report_counts_each_source() -> Result<()> {
    let fx = sample_machine()?;
    fx.descriptor("apps", "broken.desktop", "no header here\n")?;
    let outcome = scan_with_report(&fx.config(&["apps"], &["bin"]));
    assert_eq!(outcome.report.manifest_entries, 3);
    assert_eq!(outcome.report.path_entries, 6);
    assert_eq!(outcome.report.merged_entries, 8);
    assert_eq!(outcome.report.issues.len(), 1);
    assert!(!outcome.report.cap_reached);
    Ok(())
}

#[test]
fn store_swaps_in_new_catalog_on_rescan() -> Result<()> {
    let fx = sample_machine()?;
    let store = CatalogStore::new(fx.config(&["apps"], &["bin"]));
    store.request_scan()?.wait()?;
    let first = store.current();
    assert_eq!(first.len(), 8);

    fx.executable("bin", "blender")?;
    store.scan_now()?;
    let second = store.current();
    assert_eq!(second.len(), 9);
    assert_eq!(second.find("blender").unwrap().category, "Media");
    // The earlier snapshot is untouched.
    assert_eq!(first.len(), 8);
    assert_eq!(store.generation(), 2);
    Ok(())
}
