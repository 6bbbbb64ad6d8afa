//! Per-action schema properties
//!
//! Some schema options only apply in one direction, e.g. casting while
//! parsing but not while serializing. [`ActionFlag`] is an on/off switch per
//! action and [`ActionProperty`] a value per action with a fallback.

use crate::action::Action;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Boolean switch that can be enabled for all actions or a subset.
///
/// On the wire it is `true`, `false`, or a sorted list of action names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionFlag {
    all: bool,
    actions: BTreeSet<Action>,
}

impl ActionFlag {
    /// Enabled for every action
    pub fn all() -> Self {
        Self {
            all: true,
            actions: BTreeSet::new(),
        }
    }

    /// Enabled for the given actions only
    pub fn only(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            all: false,
            actions: actions.into_iter().collect(),
        }
    }

    /// Whether the flag applies to `action`
    pub fn enabled(&self, action: Action) -> bool {
        self.all || self.actions.contains(&action)
    }

    pub fn is_all(&self) -> bool {
        self.all
    }

    pub fn set_all(&mut self, all: bool) {
        self.all = all;
    }

    /// Replace the enabled actions
    pub fn set_actions(&mut self, actions: impl IntoIterator<Item = Action>) {
        self.actions = actions.into_iter().collect();
    }

    pub fn append_actions(&mut self, actions: impl IntoIterator<Item = Action>) {
        self.actions.extend(actions);
    }

    pub fn unset_actions(&mut self, actions: impl IntoIterator<Item = Action>) {
        for action in actions {
            self.actions.remove(&action);
        }
    }

    pub fn reset_actions(&mut self) {
        self.actions.clear();
    }

    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.actions.iter().copied()
    }

    /// True when the flag is disabled for every action
    pub fn is_empty(&self) -> bool {
        !self.all && self.actions.is_empty()
    }
}

impl From<bool> for ActionFlag {
    fn from(all: bool) -> Self {
        Self {
            all,
            actions: BTreeSet::new(),
        }
    }
}

impl Serialize for ActionFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.all {
            serializer.serialize_bool(true)
        } else if self.actions.is_empty() {
            serializer.serialize_bool(false)
        } else {
            serializer.collect_seq(&self.actions)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ActionFlagRepr {
    Flag(bool),
    Actions(Vec<Action>),
}

impl<'de> Deserialize<'de> for ActionFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ActionFlagRepr::deserialize(deserializer)? {
            ActionFlagRepr::Flag(all) => ActionFlag::from(all),
            ActionFlagRepr::Actions(actions) => ActionFlag::only(actions),
        })
    }
}

/// Value that can differ per action, with a default for unset actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionProperty<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<T>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    actions: BTreeMap<Action, T>,
}

impl<T> Default for ActionProperty<T> {
    fn default() -> Self {
        Self {
            default: None,
            actions: BTreeMap::new(),
        }
    }
}

impl<T> ActionProperty<T> {
    /// Value for `action`, falling back to the default
    pub fn get(&self, action: Action) -> Option<&T> {
        self.actions.get(&action).or(self.default.as_ref())
    }

    pub fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }

    pub fn set_default(&mut self, value: T) {
        self.default = Some(value);
    }

    pub fn unset_default(&mut self) {
        self.default = None;
    }

    pub fn set_action(&mut self, action: Action, value: T) {
        self.actions.insert(action, value);
    }

    pub fn unset_actions(&mut self, actions: impl IntoIterator<Item = Action>) {
        for action in actions {
            self.actions.remove(&action);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wire_forms() {
        assert_eq!(serde_json::to_string(&ActionFlag::all()).unwrap(), "true");
        assert_eq!(serde_json::to_string(&ActionFlag::default()).unwrap(), "false");

        let flag = ActionFlag::only([Action::Serialize, Action::Parse]);
        assert_eq!(
            serde_json::to_string(&flag).unwrap(),
            r#"["PARSE","SERIALIZE"]"#
        );
    }

    #[test]
    fn test_flag_decode() {
        let flag: ActionFlag = serde_json::from_str("true").unwrap();
        assert!(flag.enabled(Action::Parse));
        assert!(flag.enabled(Action::Serialize));

        let flag: ActionFlag = serde_json::from_str(r#"["SERIALIZE"]"#).unwrap();
        assert!(!flag.enabled(Action::Parse));
        assert!(flag.enabled(Action::Serialize));

        assert!(serde_json::from_str::<ActionFlag>(r#"["VALIDATE"]"#).is_err());
    }

    #[test]
    fn test_flag_mutation() {
        let mut flag = ActionFlag::default();
        assert!(flag.is_empty());

        flag.append_actions([Action::Parse]);
        assert!(flag.enabled(Action::Parse));

        flag.set_all(true);
        flag.unset_actions([Action::Parse]);
        assert!(flag.enabled(Action::Parse));

        flag.set_all(false);
        assert!(flag.is_empty());
    }

    #[test]
    fn test_property_fallback() {
        let mut format = ActionProperty::default();
        assert!(format.get(Action::Parse).is_none());

        format.set_default("%Y".to_string());
        format.set_action(Action::Serialize, "%d".to_string());
        assert_eq!(format.get(Action::Parse).unwrap(), "%Y");
        assert_eq!(format.get(Action::Serialize).unwrap(), "%d");

        let wire = serde_json::to_value(&format).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({"default": "%Y", "actions": {"SERIALIZE": "%d"}})
        );

        format.unset_actions([Action::Serialize]);
        assert_eq!(format.get(Action::Serialize).unwrap(), "%Y");
    }
}
