use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::routes::keys as route_keys;

/// Display grouping for palette results. Presentation only: selection
/// arithmetic always runs over the flat filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Navigation,
    Actions,
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandGroup::Navigation => f.write_str("Navigation"),
            CommandGroup::Actions => f.write_str("Actions"),
        }
    }
}

/// A single invokable palette action bound to a navigation target.
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    /// Unique across the registry.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Route key the command navigates to on selection.
    pub target_key: String,
    pub icon: String,
    pub keywords: Vec<String>,
    pub group: CommandGroup,
}

impl CommandDescriptor {
    fn new(
        id: &str,
        title: &str,
        description: &str,
        target_key: &str,
        icon: &str,
        keywords: &[&str],
        group: CommandGroup,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            target_key: target_key.to_string(),
            icon: icon.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            group,
        }
    }

    /// Filtering rule: the case-insensitive query is a substring of the
    /// title, the description, or any one keyword.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self
                .keywords
                .iter()
                .any(|keyword| keyword.to_lowercase().contains(&query))
    }
}

/// Static, ordered registry of palette commands.
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
}

impl CommandRegistry {
    /// The fixed dashboard command set, in display order.
    pub fn new() -> Self {
        use CommandGroup::*;

        let commands = vec![
            CommandDescriptor::new(
                "go-dashboard",
                "Go to Dashboard",
                "Open the operational overview",
                route_keys::DASHBOARD,
                "gauge",
                &["home", "overview", "start"],
                Navigation,
            ),
            CommandDescriptor::new(
                "go-loads",
                "Go to Loads",
                "Open the load board",
                route_keys::LOADS,
                "package",
                &["freight", "shipments", "board"],
                Navigation,
            ),
            CommandDescriptor::new(
                "go-drivers",
                "Go to Drivers",
                "Open the driver roster",
                route_keys::DRIVERS,
                "users",
                &["fleet", "roster", "trucks"],
                Navigation,
            ),
            CommandDescriptor::new(
                "go-negotiations",
                "Go to Negotiations",
                "Open rate negotiations",
                route_keys::NEGOTIATIONS,
                "handshake",
                &["rates", "bids", "offers"],
                Navigation,
            ),
            CommandDescriptor::new(
                "go-analytics",
                "Go to Analytics",
                "Open fleet analytics",
                route_keys::ANALYTICS,
                "chart",
                &["metrics", "reports", "revenue"],
                Navigation,
            ),
            CommandDescriptor::new(
                "go-settings",
                "Go to Settings",
                "Open workspace settings",
                route_keys::SETTINGS,
                "gear",
                &["preferences", "account"],
                Navigation,
            ),
            CommandDescriptor::new(
                "create-load",
                "Create Load",
                "Post a new load to the board",
                route_keys::LOAD_CREATE,
                "plus",
                &["new", "post", "freight"],
                Actions,
            ),
        ];

        Self { commands }
    }

    /// Build a registry from caller-supplied commands. Ids must be unique.
    pub fn with_commands(commands: Vec<CommandDescriptor>) -> CoreResult<Self> {
        for (i, command) in commands.iter().enumerate() {
            if commands[..i].iter().any(|other| other.id == command.id) {
                return Err(CoreError::InvalidInput(format!(
                    "duplicate command id: {}",
                    command.id
                )));
            }
        }
        Ok(Self { commands })
    }

    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|command| command.id == id)
    }

    /// Indices of commands matching `query`, preserving registry order.
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<usize> {
        self.commands
            .iter()
            .enumerate()
            .filter(|(_, command)| query.is_empty() || command.matches(query))
            .map(|(index, _)| index)
            .collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
