//! Prompt assembly for the card generator.
//!
//! The prompt is a fixed instruction block with three substitutions: the
//! anchor clause, the preferences clause and the user query. Inputs are
//! embedded verbatim and nothing here depends on state, so the same request
//! always yields the same prompt.

const PREAMBLE: &str = "\
You are a lifestyle valet assistant. Given a user query, detect the context and return exactly 6 recommendations in JSON format.

Categories to detect: vacation/travel, fashion, music, food, wellness, nightlife, shopping

For each query, return:
- 2 YouTube video suggestions (relevant to the topic)
- 2 contextual offers (hotels for travel, products for fashion, restaurants for food, etc.)
- 2 song suggestions that blend the user's anchor seed vibe with the query context";

const RESPONSE_FORMAT: &str = r#"Respond ONLY with valid JSON in this exact format:
{
  "category": "travel",
  "cards": [
    {"slot": 1, "type": "youtube", "title": "Video Title", "subtitle": "Channel Name", "searchQuery": "youtube search terms"},
    {"slot": 2, "type": "youtube", "title": "Video Title", "subtitle": "Channel Name", "searchQuery": "youtube search terms"},
    {"slot": 3, "type": "offer", "title": "Hotel/Product Name", "subtitle": "Location/Brand", "searchQuery": "expedia or shopping search terms", "price": "$XXX"},
    {"slot": 4, "type": "offer", "title": "Hotel/Product Name", "subtitle": "Location/Brand", "searchQuery": "expedia or shopping search terms", "price": "$XXX"},
    {"slot": 5, "type": "song", "title": "Song Title", "artist": "Artist Name"},
    {"slot": 6, "type": "song", "title": "Song Title", "artist": "Artist Name"}
  ]
}"#;

/// Sentence pointing the song picks at the user's anchor seed. Empty when
/// there is no anchor.
pub fn anchor_clause(anchor: &str) -> String {
    if anchor.is_empty() {
        return String::new();
    }
    format!(
        "Music Anchor Seed: \"{}\". Use this as the vibe reference for song suggestions. ",
        anchor
    )
}

/// Sentence listing the user's preference tags in input order. Empty when
/// there are none.
pub fn preferences_clause(prefs: &[String]) -> String {
    if prefs.is_empty() {
        return String::new();
    }
    format!("User preferences: {}. ", prefs.join(", "))
}

pub fn build_prompt(query: &str, anchor: &str, prefs: &[String]) -> String {
    format!(
        "{preamble}\n\n{anchor}{prefs}\n\nUser Query: \"{query}\"\n\n{format}",
        preamble = PREAMBLE,
        anchor = anchor_clause(anchor),
        prefs = preferences_clause(prefs),
        query = query,
        format = RESPONSE_FORMAT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn query_is_embedded_verbatim() {
        let query = "weekend in Lisbon with \"good\" coffee & fado";
        let prompt = build_prompt(query, "", &[]);
        assert!(prompt.contains(&format!("User Query: \"{}\"", query)));
    }

    #[test]
    fn anchor_clause_only_when_present() {
        let with = build_prompt("beach day", "Daft Punk - Digital Love", &[]);
        assert!(with.contains("Music Anchor Seed: \"Daft Punk - Digital Love\"."));
        assert!(with.contains("vibe reference"));

        let without = build_prompt("beach day", "", &[]);
        assert!(!without.contains("Music Anchor Seed"));
        assert!(!without.contains("vibe reference"));
    }

    #[test]
    fn preferences_joined_in_order() {
        let p = prefs(&["vegan", "budget", "outdoors"]);
        let prompt = build_prompt("dinner ideas", "", &p);
        assert!(prompt.contains("User preferences: vegan, budget, outdoors. "));

        let none = build_prompt("dinner ideas", "", &[]);
        assert!(!none.contains("User preferences:"));
    }

    #[test]
    fn anchor_precedes_preferences_and_query() {
        let prompt = build_prompt("rooftop bars", "lofi beats", &prefs(&["jazz"]));
        let anchor_at = prompt.find("Music Anchor Seed").unwrap();
        let prefs_at = prompt.find("User preferences").unwrap();
        let query_at = prompt.find("User Query").unwrap();
        assert!(anchor_at < prefs_at && prefs_at < query_at);
    }

    #[test]
    fn fixed_instructions_are_present() {
        let prompt = build_prompt("spa retreat", "", &[]);
        for needle in [
            "exactly 6 recommendations",
            "vacation/travel, fashion, music, food, wellness, nightlife, shopping",
            "2 YouTube video suggestions",
            "2 contextual offers",
            "2 song suggestions",
            "Respond ONLY with valid JSON",
            "\"searchQuery\"",
            "\"price\"",
            "\"artist\"",
        ] {
            assert!(prompt.contains(needle), "missing {needle:?}");
        }
    }

    #[test]
    fn deterministic() {
        let p = prefs(&["a", "b"]);
        assert_eq!(build_prompt("q", "x", &p), build_prompt("q", "x", &p));
    }
}
