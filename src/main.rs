use net::HttpLoader;
use session::{RepairSession, SessionConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["repair", live_url, reference_url] => repair(live_url, reference_url),
        ["inspect", url] => inspect(url),
        _ => {
            eprintln!("usage: pagemend repair <live-url> <reference-url>");
            eprintln!("       pagemend inspect <url>");
            ExitCode::from(2)
        }
    }
}

fn repair(live_url: &str, reference_url: &str) -> ExitCode {
    let session = RepairSession::new(HttpLoader::new());
    let config = SessionConfig::new(live_url, reference_url);
    let outcome = match session.run(&config) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    for report in &outcome.report.targets {
        println!("{:<22} {:?}", report.target, report.outcome);
        for change in &report.changes {
            println!("    {change:?}");
        }
    }
    println!(
        "{} change(s), {} skipped target(s)",
        outcome.report.change_count(),
        outcome.report.skipped().len()
    );
    ExitCode::SUCCESS
}

// One-page diagnostics: the values a repair run would look at.
fn inspect(url: &str) -> ExitCode {
    use dom::{Selector, query_selector, query_selector_all};
    use session::DocumentLoader;

    let loader = HttpLoader::new();
    let tree = match loader.load(url) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let sel = |s: &str| Selector::parse(s).expect("static selector");

    if let Some(name) = query_selector(&tree, &sel("#recipe-name")) {
        println!("recipe name: {:?} <{}>", tree.content(name), tree.name(name).unwrap_or(""));
    }

    if let Some(description) = query_selector(&tree, &sel("p.description")) {
        let mut hrefs = Vec::new();
        dom::collect_stylesheet_hrefs(&tree, &mut hrefs);
        for href in hrefs {
            let sheet_url = loader.resolve_href(url, &href);
            match loader.load_stylesheet(&sheet_url) {
                Ok(sheet) => {
                    if let Some(size) =
                        css::resolve(&tree, description, "font-size", &sheet.rules)
                    {
                        println!("description font-size: {size} (from {href})");
                    }
                }
                Err(e) => eprintln!("warning: {e}"),
            }
        }
    }

    for img in query_selector_all(&tree, &sel("img")) {
        println!(
            "img alt={:?} src={:?} {}x{}",
            tree.attr(img, "alt").unwrap_or(""),
            tree.attr(img, "src").unwrap_or(""),
            tree.attr(img, "width").unwrap_or("?"),
            tree.attr(img, "height").unwrap_or("?"),
        );
    }

    if let Some(paste) = query_selector(&tree, &sel("ul.ingredients-list-paste")) {
        let children = tree.children(paste);
        println!("paste list: {} item(s)", children.len());
        if let Some(&fourth) = children.get(3) {
            println!("  fourth: {:?}", tree.content(fourth));
        }
    }

    for (i, step) in query_selector_all(&tree, &sel("ol.instructions-list li"))
        .iter()
        .enumerate()
    {
        println!("step {i}: {:?}", tree.content(*step));
    }

    ExitCode::SUCCESS
}
