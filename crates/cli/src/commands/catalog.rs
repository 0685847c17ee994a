use recommender_core::config::LoadOptions;
use recommender_core::Catalog;

use crate::commands::{load_catalog, to_pretty_json, CommandResult};

pub fn run(options: LoadOptions, json: bool) -> CommandResult {
    let (_, catalog) = match load_catalog("catalog", options) {
        Ok(loaded) => loaded,
        Err(failure) => return failure,
    };

    if json {
        return to_pretty_json("catalog", &catalog);
    }
    CommandResult::output(render_human(&catalog))
}

fn render_human(catalog: &Catalog) -> String {
    let mut lines = vec![format!(
        "catalog: {} categories, {} products",
        catalog.categories().len(),
        catalog.len()
    )];

    for category in catalog.categories() {
        lines.push(format!("{}:", category.name));
        for product in &category.products {
            lines.push(format!(
                "- {} {} | {} / 5.0 | {} sold",
                product.name,
                product.display_price(),
                product.rating,
                product.display_sales()
            ));
        }
    }

    lines.join("\n")
}
