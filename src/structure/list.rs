use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub text: String,
    pub level: u32,
}

impl ListItem {
    pub fn new(text: &str, level: u32) -> Self {
        Self {
            text: text.to_string(),
            level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListEntry {
    Item(ListItem),
    List(List),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct List {
    pub level: u32,
    pub items: Vec<ListEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAdd {
    Appended,
    AppendedAfterJump { from: u32, to: u32 },
    Dropped { level: u32, list_level: u32 },
}

impl List {
    pub fn new(level: u32) -> Self {
        Self {
            level,
            items: Vec::new(),
        }
    }

    pub fn add(&mut self, item: ListItem) -> ListAdd {
        if item.level < self.level {
            warn!(
                level = item.level,
                list_level = self.level,
                "dropping list item shallower than its list"
            );
            return ListAdd::Dropped {
                level: item.level,
                list_level: self.level,
            };
        }

        if item.level == self.level {
            self.items.push(ListEntry::Item(item));
            return ListAdd::Appended;
        }

        if let Some(ListEntry::List(nested)) = self.items.last_mut() {
            if nested.level <= item.level {
                return nested.add(item);
            }
        }

        let jump = (item.level - self.level > 1).then_some((self.level, item.level));
        if let Some((from, to)) = jump {
            warn!(from, to, "list level jumps more than one step");
        }

        let mut nested = List::new(item.level);
        nested.items.push(ListEntry::Item(item));
        self.items.push(ListEntry::List(nested));

        match jump {
            Some((from, to)) => ListAdd::AppendedAfterJump { from, to },
            None => ListAdd::Appended,
        }
    }

    pub fn item_count(&self) -> usize {
        self.items
            .iter()
            .map(|entry| match entry {
                ListEntry::Item(_) => 1,
                ListEntry::List(nested) => nested.item_count(),
            })
            .sum()
    }

    pub fn text(&self) -> String {
        let mut lines = Vec::new();
        self.collect_lines(&mut lines);
        lines.join("\n")
    }

    fn collect_lines(&self, lines: &mut Vec<String>) {
        for entry in &self.items {
            match entry {
                ListEntry::Item(item) => lines.push(item.text.clone()),
                ListEntry::List(nested) => nested.collect_lines(lines),
            }
        }
    }
}
