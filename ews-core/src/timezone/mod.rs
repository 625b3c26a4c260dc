//! Time zone definitions as carried inside EWS payloads.
//!
//! A [`TimeZoneDefinition`] is an arena of periods and transition groups
//! keyed by id. Transitions refer to those entities by id, and every
//! reference is resolved against the entities registered so far: a
//! document is read top to bottom in one pass, so forward references fail.

mod group;
mod period;
mod transition;

use indexmap::IndexMap;
use indexmap::map::Entry;
use roxmltree::Node;
use tracing::{debug, trace};

pub use group::TimeZoneTransitionGroup;
pub use period::TimeZonePeriod;
pub use transition::{
    DayOfMonth, TargetKind, TimeZoneTransition, TransitionRule, TransitionTarget, TransitionType,
    WeekIndex,
};

use crate::error::{EwsError, EwsResult};
use crate::xml::{self, EwsXmlWriter, XmlNamespace, names};

/// A complete time zone: its periods, transition groups and the top-level
/// transitions between groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeZoneDefinition {
    pub id: String,
    pub name: String,
    periods: IndexMap<String, TimeZonePeriod>,
    transition_groups: IndexMap<String, TimeZoneTransitionGroup>,
    transitions: Vec<TimeZoneTransition>,
}

impl TimeZoneDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        TimeZoneDefinition {
            id: id.into(),
            name: name.into(),
            periods: IndexMap::new(),
            transition_groups: IndexMap::new(),
            transitions: Vec::new(),
        }
    }

    pub fn period(&self, id: &str) -> Option<&TimeZonePeriod> {
        self.periods.get(id)
    }

    pub fn transition_group(&self, id: &str) -> Option<&TimeZoneTransitionGroup> {
        self.transition_groups.get(id)
    }

    /// Periods in registration order.
    pub fn periods(&self) -> impl Iterator<Item = &TimeZonePeriod> {
        self.periods.values()
    }

    /// Transition groups in registration order.
    pub fn transition_groups(&self) -> impl Iterator<Item = &TimeZoneTransitionGroup> {
        self.transition_groups.values()
    }

    pub fn transitions(&self) -> &[TimeZoneTransition] {
        &self.transitions
    }

    /// Looks up `id` among the registered entities of `kind`.
    ///
    /// Existence is checked before a target is built, so a failed lookup
    /// never produces a target.
    pub fn resolve_target(&self, kind: TargetKind, id: &str) -> EwsResult<TransitionTarget> {
        let exists = match kind {
            TargetKind::Period => self.periods.contains_key(id),
            TargetKind::Group => self.transition_groups.contains_key(id),
        };
        if !exists {
            return Err(EwsError::TargetNotFound {
                kind,
                id: id.to_string(),
            });
        }
        Ok(match kind {
            TargetKind::Period => TransitionTarget::Period(id.to_string()),
            TargetKind::Group => TransitionTarget::Group(id.to_string()),
        })
    }

    fn check_target(&self, transition: &TimeZoneTransition) -> EwsResult<()> {
        let target = transition.target();
        self.resolve_target(target.kind(), target.id()).map(|_| ())
    }

    pub fn add_period(&mut self, period: TimeZonePeriod) -> EwsResult<()> {
        match self.periods.entry(period.id.clone()) {
            Entry::Occupied(entry) => Err(EwsError::DuplicateTimeZoneEntity {
                kind: TargetKind::Period,
                id: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(period);
                Ok(())
            }
        }
    }

    /// Registers a group. Its transitions must target entities already registered.
    pub fn add_transition_group(&mut self, group: TimeZoneTransitionGroup) -> EwsResult<()> {
        if self.transition_groups.contains_key(&group.id) {
            return Err(EwsError::DuplicateTimeZoneEntity {
                kind: TargetKind::Group,
                id: group.id,
            });
        }
        for transition in group.transitions() {
            self.check_target(transition)?;
        }
        self.transition_groups.insert(group.id.clone(), group);
        Ok(())
    }

    /// Appends a top-level transition. Its target must already be registered.
    pub fn add_transition(&mut self, transition: TimeZoneTransition) -> EwsResult<()> {
        self.check_target(&transition)?;
        self.transitions.push(transition);
        Ok(())
    }

    /// Parses the first `TimeZoneDefinition` element found in `document`.
    pub fn from_xml(document: &str) -> EwsResult<Self> {
        let doc = roxmltree::Document::parse(document)?;
        let node = xml::find_element(doc.root_element(), names::TIME_ZONE_DEFINITION)
            .ok_or_else(|| {
                EwsError::UnexpectedXml(format!("no {} element found", names::TIME_ZONE_DEFINITION))
            })?;
        Self::read_from_xml(node)
    }

    /// Decodes a `TimeZoneDefinition` element in a single pass.
    ///
    /// Any error aborts the whole definition; a partially resolved rule set
    /// is never returned.
    pub fn read_from_xml(node: Node<'_, '_>) -> EwsResult<Self> {
        // Servers sometimes send definitions without an id; give them one
        // so the definition can still be referenced.
        let id = match node.attribute(names::ATTR_ID) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        };
        let name = node.attribute(names::ATTR_NAME).unwrap_or_default();
        let mut definition = TimeZoneDefinition::new(id, name);

        for child in xml::child_elements(node) {
            match child.tag_name().name() {
                names::PERIODS => {
                    for period in xml::child_elements(child) {
                        definition.add_period(TimeZonePeriod::read_from_xml(period)?)?;
                    }
                }
                names::TRANSITIONS_GROUPS => {
                    for group in xml::child_elements(child) {
                        let group = TimeZoneTransitionGroup::read_from_xml(&definition, group)?;
                        definition.add_transition_group(group)?;
                    }
                }
                names::TRANSITIONS => {
                    for transition in xml::child_elements(child) {
                        let transition =
                            TimeZoneTransition::read_from_xml(&definition, transition)?;
                        definition.add_transition(transition)?;
                    }
                }
                other => trace!(element = other, "skipping unknown time zone element"),
            }
        }

        debug!(
            id = %definition.id,
            periods = definition.periods.len(),
            groups = definition.transition_groups.len(),
            transitions = definition.transitions.len(),
            "loaded time zone definition"
        );
        Ok(definition)
    }

    /// Writes the `t:TimeZoneDefinition` element. Empty collections are omitted.
    pub fn write_to_xml(&self, writer: &mut EwsXmlWriter) -> EwsResult<()> {
        self.write_element(writer, &[])
    }

    /// Serializes the definition as a standalone document.
    pub fn to_xml(&self) -> EwsResult<String> {
        let mut writer = EwsXmlWriter::new();
        self.write_element(&mut writer, &[("xmlns:t", XmlNamespace::Types.uri())])?;
        writer.into_string()
    }

    fn write_element(
        &self,
        writer: &mut EwsXmlWriter,
        namespaces: &[(&str, &str)],
    ) -> EwsResult<()> {
        let mut attributes = namespaces.to_vec();
        attributes.push((names::ATTR_NAME, self.name.as_str()));
        attributes.push((names::ATTR_ID, self.id.as_str()));
        writer.write_start_element_with_attributes(
            XmlNamespace::Types,
            names::TIME_ZONE_DEFINITION,
            &attributes,
        )?;

        if !self.periods.is_empty() {
            writer.write_start_element(XmlNamespace::Types, names::PERIODS)?;
            for period in self.periods.values() {
                period.write_to_xml(writer)?;
            }
            writer.write_end_element()?;
        }

        if !self.transition_groups.is_empty() {
            writer.write_start_element(XmlNamespace::Types, names::TRANSITIONS_GROUPS)?;
            for group in self.transition_groups.values() {
                group.write_to_xml(writer)?;
            }
            writer.write_end_element()?;
        }

        if !self.transitions.is_empty() {
            writer.write_start_element(XmlNamespace::Types, names::TRANSITIONS)?;
            for transition in &self.transitions {
                transition.write_to_xml(writer)?;
            }
            writer.write_end_element()?;
        }

        writer.write_end_element()
    }

    /// Checks the definition is complete enough to be sent to a server.
    pub fn validate(&self) -> EwsResult<()> {
        let invalid = |reason: &str| {
            EwsError::InvalidTimeZoneDefinition(format!("'{}' {}", self.id, reason))
        };

        if self.periods.is_empty()
            || self.transition_groups.is_empty()
            || self.transitions.is_empty()
        {
            return Err(invalid("needs at least one period, transition group and transition"));
        }
        if self.transition_groups.len() != self.transitions.len() {
            return Err(invalid("must have one top-level transition per transition group"));
        }
        if self.transitions[0].transition_type() != TransitionType::Transition {
            return Err(invalid("must start with a plain Transition"));
        }
        for transition in &self.transitions {
            if !matches!(
                transition.transition_type(),
                TransitionType::Transition | TransitionType::AbsoluteDate
            ) {
                return Err(invalid(&format!(
                    "has a top-level {} (only Transition and AbsoluteDateTransition are allowed)",
                    transition.xml_element_name()
                )));
            }
            if transition.target().kind() != TargetKind::Group {
                return Err(invalid("has a top-level transition that does not target a group"));
            }
        }
        self.transition_groups
            .values()
            .try_for_each(TimeZoneTransitionGroup::validate)
    }
}
