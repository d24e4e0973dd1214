use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use launch_atlas_core::SelectionLevel;

/// Drill-down list for one selection level, with optional fuzzy filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub level: SelectionLevel,
    pub options: Vec<String>,
    pub index: usize,
    pub query: String,
    pub searching: bool,
}

impl Picker {
    pub fn new(level: SelectionLevel, options: Vec<String>) -> Self {
        Self {
            level,
            options,
            index: 0,
            query: String::new(),
            searching: false,
        }
    }

    pub const fn title(&self) -> &'static str {
        match self.level {
            SelectionLevel::Era => "Choose an era",
            SelectionLevel::Provider => "Choose a provider",
            SelectionLevel::Rocket => "Choose a rocket",
        }
    }

    /// Options matching the query, best match first. Without a query the
    /// original order is kept.
    pub fn visible(&self) -> Vec<&str> {
        if self.query.is_empty() {
            return self.options.iter().map(String::as_str).collect();
        }
        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, &str)> = self
            .options
            .iter()
            .filter_map(|option| {
                fuzzy_match_score(&matcher, option, &self.query).map(|score| (score, option.as_str()))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored.into_iter().map(|(_, option)| option).collect()
    }

    pub fn selected(&self) -> Option<&str> {
        self.visible().get(self.index).copied()
    }

    pub fn next(&mut self) {
        self.index = step(self.index, self.visible().len(), true);
    }

    pub fn previous(&mut self) {
        self.index = step(self.index, self.visible().len(), false);
    }

    pub fn push_query(&mut self, ch: char) {
        self.query.push(ch);
        self.index = 0;
    }

    /// Removes the last query character. Returns `false` when the query was
    /// already empty.
    pub fn pop_query(&mut self) -> bool {
        let popped = self.query.pop().is_some();
        self.index = 0;
        popped
    }
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Moves one row through `len` options, wrapping at both ends.
const fn step(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (index + 1) % len
    } else if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker() -> Picker {
        Picker::new(
            SelectionLevel::Provider,
            vec![
                "SpaceX".to_string(),
                "Roscosmos".to_string(),
                "Rocket Lab".to_string(),
            ],
        )
    }

    #[test]
    fn navigation_wraps() {
        let mut picker = picker();
        picker.previous();
        assert_eq!(picker.selected(), Some("Rocket Lab"));
        picker.next();
        assert_eq!(picker.selected(), Some("SpaceX"));
    }

    #[test]
    fn query_filters_fuzzily() {
        let mut picker = picker();
        for ch in "rlab".chars() {
            picker.push_query(ch);
        }
        assert_eq!(picker.visible(), vec!["Rocket Lab"]);
        assert_eq!(picker.selected(), Some("Rocket Lab"));

        assert!(picker.pop_query());
        picker.query.clear();
        assert!(!picker.pop_query());
        assert_eq!(picker.visible().len(), 3);
    }

    #[test]
    fn empty_result_selects_nothing() {
        let mut picker = picker();
        picker.push_query('z');
        picker.push_query('q');
        assert!(picker.visible().is_empty());
        assert_eq!(picker.selected(), None);
        picker.next();
        assert_eq!(picker.index, 0);
    }
}
