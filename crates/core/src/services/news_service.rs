use crate::models::news::{NewsItem, TaggedNewsItem, TopicCount, TopicMap};

/// Keyword-based, multi-label headline classifier.
///
/// A topic applies when any of its keywords occurs in the headline
/// (case-insensitive substring match). Headlines matching no topic get the
/// map's default topic, so every tagged item carries at least one tag.
pub struct NewsService {
    topics: TopicMap,
    /// Lowercased keywords, parallel to `topics.rules`
    lowered: Vec<Vec<String>>,
}

impl NewsService {
    pub fn new(topics: TopicMap) -> Self {
        let lowered = topics
            .rules
            .iter()
            .map(|rule| {
                rule.keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .collect();
        Self { topics, lowered }
    }

    #[must_use]
    pub fn topic_map(&self) -> &TopicMap {
        &self.topics
    }

    /// Topics matched by a headline, in rule order; `[default]` if none match.
    pub fn classify(&self, headline: &str) -> Vec<String> {
        let text = headline.to_lowercase();
        let mut tags: Vec<String> = self
            .topics
            .rules
            .iter()
            .zip(&self.lowered)
            .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k.as_str())))
            .map(|(rule, _)| rule.topic.clone())
            .collect();
        // Two rules may share a name; a tag is listed once.
        let mut seen = std::collections::HashSet::new();
        tags.retain(|t| seen.insert(t.clone()));

        if tags.is_empty() {
            tags.push(self.topics.default_topic.clone());
        }
        tags
    }

    /// Classify the first `limit` items of a feed.
    pub fn tag_items(&self, items: Vec<NewsItem>, limit: usize) -> Vec<TaggedNewsItem> {
        items
            .into_iter()
            .take(limit)
            .map(|item| {
                let topics = self.classify(&item.title);
                TaggedNewsItem { item, topics }
            })
            .collect()
    }

    /// Headline count per topic, most frequent first.
    ///
    /// The default topic is not counted. Ties keep rule order.
    pub fn topic_counts(&self, tagged: &[TaggedNewsItem]) -> Vec<TopicCount> {
        let mut counts: Vec<TopicCount> = Vec::new();
        for rule in &self.topics.rules {
            if counts.iter().any(|c| c.topic == rule.topic) {
                continue;
            }
            let count = tagged.iter().filter(|t| t.has_topic(&rule.topic)).count();
            if count > 0 {
                counts.push(TopicCount {
                    topic: rule.topic.clone(),
                    count,
                });
            }
        }
        // Stable sort: equal counts stay in rule order.
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }

    /// Headlines grouped per topic. Groups appear in first-seen order; a
    /// multi-topic headline appears in each of its groups.
    pub fn group_by_topic<'a>(
        &self,
        tagged: &'a [TaggedNewsItem],
    ) -> Vec<(String, Vec<&'a TaggedNewsItem>)> {
        let mut groups: Vec<(String, Vec<&TaggedNewsItem>)> = Vec::new();
        for item in tagged {
            for topic in &item.topics {
                match groups.iter_mut().find(|(name, _)| name == topic) {
                    Some((_, members)) => members.push(item),
                    None => groups.push((topic.clone(), vec![item])),
                }
            }
        }
        groups
    }

    /// Headlines tagged with at least one of `topics`.
    pub fn filter_by_topics<'a>(
        &self,
        tagged: &'a [TaggedNewsItem],
        topics: &[&str],
    ) -> Vec<&'a TaggedNewsItem> {
        tagged
            .iter()
            .filter(|t| topics.iter().any(|topic| t.has_topic(topic)))
            .collect()
    }

    /// Up to `n` headlines carrying a real (non-default) topic, feed order.
    pub fn highlighted(&self, tagged: &[TaggedNewsItem], n: usize) -> Vec<String> {
        tagged
            .iter()
            .filter(|t| t.topics.iter().any(|topic| *topic != self.topics.default_topic))
            .take(n)
            .map(|t| t.item.title.clone())
            .collect()
    }
}

impl Default for NewsService {
    fn default() -> Self {
        Self::new(TopicMap::default())
    }
}
