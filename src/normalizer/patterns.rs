use crate::normalizer::LocationPattern;

/// Built-in pattern table for European city labels.
///
/// Order matters: entries are evaluated top to bottom and the first match
/// wins. Spelling variants of the same city sit next to each other and map
/// to one canonical name. City names that exist in more than one country
/// ("Nice" below) appear only as country-constrained entries, so a label
/// from an unlisted country never cross-matches.
pub fn builtin_patterns() -> Vec<LocationPattern> {
    vec![
        // Poland
        LocationPattern::in_country("warszawa", "Warsaw", "PL"),
        LocationPattern::in_country("warsaw", "Warsaw", "PL"),
        LocationPattern::in_country("krakow", "Krakow", "PL"),
        LocationPattern::in_country("kraków", "Krakow", "PL"),
        LocationPattern::in_country("gdansk", "Gdansk", "PL"),
        LocationPattern::in_country("gdańsk", "Gdansk", "PL"),
        LocationPattern::in_country("wroclaw", "Wroclaw", "PL"),
        LocationPattern::in_country("wrocław", "Wroclaw", "PL"),
        // France
        LocationPattern::in_country("paris", "Paris", "FR"),
        LocationPattern::in_country("marseille", "Marseille", "FR"),
        LocationPattern::in_country("lyon", "Lyon", "FR"),
        // Germany
        LocationPattern::in_country("berlin", "Berlin", "DE"),
        LocationPattern::in_country("munich", "Munich", "DE"),
        LocationPattern::in_country("münchen", "Munich", "DE"),
        LocationPattern::in_country("muenchen", "Munich", "DE"),
        LocationPattern::in_country("hamburg", "Hamburg", "DE"),
        // Great Britain
        LocationPattern::in_country("london", "London", "GB"),
        LocationPattern::in_country("manchester", "Manchester", "GB"),
        LocationPattern::in_country("edinburgh", "Edinburgh", "GB"),
        // "Nice" exists in FR, PL and GB; each entry is constrained so the
        // canonical entity is determined by the observation country.
        LocationPattern::in_country("nice", "Nice", "FR"),
        LocationPattern::in_country("nice", "Nice", "PL"),
        LocationPattern::in_country("nice", "Nice", "GB"),
        // Spain
        LocationPattern::in_country("madrid", "Madrid", "ES"),
        LocationPattern::in_country("barcelona", "Barcelona", "ES"),
        // Italy
        LocationPattern::in_country("rome", "Rome", "IT"),
        LocationPattern::in_country("roma", "Rome", "IT"),
        LocationPattern::in_country("milan", "Milan", "IT"),
        LocationPattern::in_country("milano", "Milan", "IT"),
        // Central Europe
        LocationPattern::in_country("vienna", "Vienna", "AT"),
        LocationPattern::in_country("wien", "Vienna", "AT"),
        LocationPattern::in_country("prague", "Prague", "CZ"),
        LocationPattern::in_country("praha", "Prague", "CZ"),
        LocationPattern::in_country("budapest", "Budapest", "HU"),
        // Benelux and Iberia
        LocationPattern::in_country("amsterdam", "Amsterdam", "NL"),
        LocationPattern::in_country("brussels", "Brussels", "BE"),
        LocationPattern::in_country("bruxelles", "Brussels", "BE"),
        LocationPattern::in_country("lisbon", "Lisbon", "PT"),
        LocationPattern::in_country("lisboa", "Lisbon", "PT"),
        // Nordics
        LocationPattern::in_country("stockholm", "Stockholm", "SE"),
        LocationPattern::in_country("copenhagen", "Copenhagen", "DK"),
        LocationPattern::in_country("københavn", "Copenhagen", "DK"),
        LocationPattern::in_country("oslo", "Oslo", "NO"),
        LocationPattern::in_country("helsinki", "Helsinki", "FI"),
    ]
}
