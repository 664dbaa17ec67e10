//! Display emojis for GitHub repository topics.

/// Known topics and how `list` renders them.
pub const TOPICS: &[(&str, &str)] = &[
    ("browser", "🌍"),
    ("c", "𝗖"),
    ("configs", "📝"),
    ("couchbase", "🛋"),
    ("cpp", "𝗖++"),
    ("db", "🗄"),
    ("docker", "🐳"),
    ("dotnet", ".🌐"),
    ("elk", "📊 🔬 📺"),
    ("java", "☕️"),
    ("json", "J👶"),
    ("kafka", "🐞"),
    ("neo4j", "📊"),
    ("python", "🐍"),
    ("server", "🛰"),
    ("spring", "🍃"),
];

pub fn topic_emoji(topic: &str) -> Option<&'static str> {
    TOPICS
        .binary_search_by(|(name, _)| (*name).cmp(topic))
        .ok()
        .map(|i| TOPICS[i].1)
}

/// `[emoji] ` for every known topic, in the order given. Unknown topics are skipped.
pub fn format_topics(topics: &[String]) -> String {
    topics
        .iter()
        .filter_map(|t| topic_emoji(t))
        .map(|e| format!("[{e}] "))
        .collect()
}
