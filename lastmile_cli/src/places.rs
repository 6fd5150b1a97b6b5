use comfy_table::{Table, presets::UTF8_FULL};
use lastmile_comparison::places::PlaceCatalog;

pub fn origins_table(catalog: &PlaceCatalog) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Origin", "Position"]);

    for origin in &catalog.origins {
        table.add_row(vec![origin.name.clone(), origin.position.to_string()]);
    }

    table
}

pub fn apartments_table(catalog: &PlaceCatalog) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Apartment",
        "Gate",
        "Front",
        "Hydrants",
        "Fire lanes",
    ]);

    for apartment in &catalog.apartments {
        table.add_row(vec![
            apartment.name.clone(),
            apartment
                .gate
                .map(|gate| gate.to_string())
                .unwrap_or_else(|| "-".to_string()),
            apartment.front.to_string(),
            apartment.hydrants.len().to_string(),
            apartment.fire_lanes.len().to_string(),
        ]);
    }

    table
}

pub fn run(catalog: &PlaceCatalog) {
    println!("{}", origins_table(catalog));
    println!("{}", apartments_table(catalog));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_list_every_place() {
        let catalog = PlaceCatalog::hanam();

        let origins = origins_table(&catalog).to_string();
        assert!(origins.contains("하남소방서"));
        assert!(origins.contains("37.539826,127.220661"));

        let apartments = apartments_table(&catalog).to_string();
        for apartment in &catalog.apartments {
            assert!(apartments.contains(&apartment.name));
        }
    }
}
