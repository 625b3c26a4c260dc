use roxmltree::Node;

use super::{TargetKind, TimeZoneDefinition, TimeZoneTransition, TransitionType};
use crate::error::{EwsError, EwsResult};
use crate::xml::{self, EwsXmlWriter, XmlNamespace, names};

/// A named, ordered sequence of transitions, usually one standard/daylight
/// rule pair in effect for a range of years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeZoneTransitionGroup {
    pub id: String,
    transitions: Vec<TimeZoneTransition>,
}

impl TimeZoneTransitionGroup {
    pub fn new(id: impl Into<String>) -> Self {
        TimeZoneTransitionGroup {
            id: id.into(),
            transitions: Vec::new(),
        }
    }

    pub fn with_transitions(id: impl Into<String>, transitions: Vec<TimeZoneTransition>) -> Self {
        TimeZoneTransitionGroup {
            id: id.into(),
            transitions,
        }
    }

    pub fn add_transition(&mut self, transition: TimeZoneTransition) {
        self.transitions.push(transition);
    }

    pub fn transitions(&self) -> &[TimeZoneTransition] {
        &self.transitions
    }

    /// Decodes a `TransitionsGroup`. Its transitions resolve against
    /// `definition`, which does not contain this group yet.
    pub(crate) fn read_from_xml(
        definition: &TimeZoneDefinition,
        node: Node<'_, '_>,
    ) -> EwsResult<Self> {
        xml::expect_element(node, names::TRANSITIONS_GROUP)?;
        let id = xml::required_id(node)?;
        let transitions = xml::child_elements(node)
            .map(|child| TimeZoneTransition::read_from_xml(definition, child))
            .collect::<EwsResult<Vec<_>>>()?;
        Ok(Self::with_transitions(id, transitions))
    }

    pub fn write_to_xml(&self, writer: &mut EwsXmlWriter) -> EwsResult<()> {
        writer.write_start_element_with_attributes(
            XmlNamespace::Types,
            names::TRANSITIONS_GROUP,
            &[(names::ATTR_ID, self.id.as_str())],
        )?;
        for transition in &self.transitions {
            transition.write_to_xml(writer)?;
        }
        writer.write_end_element()
    }

    /// A group holds one plain transition, or a pair of recurring ones,
    /// and every transition in it targets a period.
    pub fn validate(&self) -> EwsResult<()> {
        let invalid = |reason: &str| {
            EwsError::InvalidTimeZoneDefinition(format!(
                "transition group '{}' {}",
                self.id, reason
            ))
        };

        match self.transitions.as_slice() {
            [] => return Err(invalid("has no transitions")),
            [single] if single.transition_type() != TransitionType::Transition => {
                return Err(invalid("has a single transition that is not a plain Transition"));
            }
            [_] | [_, _] => {}
            _ => return Err(invalid("has more than two transitions")),
        }

        if self
            .transitions
            .iter()
            .any(|t| t.target().kind() != TargetKind::Period)
        {
            return Err(invalid("has a transition that does not target a period"));
        }
        Ok(())
    }
}
