//! Time zone transitions and the wire-tag dispatch between their variants.

use std::fmt;
use std::str::FromStr;

use chrono::{Month, NaiveDateTime, TimeDelta, Weekday};
use roxmltree::Node;

use super::{TimeZoneDefinition, TimeZonePeriod, TimeZoneTransitionGroup};
use crate::error::{EwsError, EwsResult};
use crate::xml::{self, EwsXmlWriter, XmlNamespace, names};

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// What a transition's `To` element points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Period,
    Group,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Period => "Period",
            TargetKind::Group => "Group",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = EwsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Period" => Ok(TargetKind::Period),
            "Group" => Ok(TargetKind::Group),
            other => Err(EwsError::UnsupportedTargetKind(other.to_string())),
        }
    }
}

/// The entity a transition switches to, by id within its definition.
///
/// A transition always has exactly one target; there is no way to build
/// one with neither or both.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransitionTarget {
    Period(String),
    Group(String),
}

impl TransitionTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            TransitionTarget::Period(_) => TargetKind::Period,
            TransitionTarget::Group(_) => TargetKind::Group,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            TransitionTarget::Period(id) | TransitionTarget::Group(id) => id,
        }
    }

    /// Decodes `<To Kind="...">id</To>` against the entities registered so far.
    fn read_from_xml(node: Node<'_, '_>, definition: &TimeZoneDefinition) -> EwsResult<Self> {
        let kind: TargetKind = xml::required_attribute(node, names::ATTR_KIND)?.parse()?;
        let id = xml::element_text(node);
        definition.resolve_target(kind, id)
    }

    fn write_to_xml(&self, writer: &mut EwsXmlWriter) -> EwsResult<()> {
        writer.write_element_value_with_attributes(
            XmlNamespace::Types,
            names::TO,
            &[(names::ATTR_KIND, self.kind().as_str())],
            self.id(),
        )
    }
}

/// The closed set of transition element names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionType {
    Transition,
    AbsoluteDate,
    RecurringDay,
    RecurringDate,
}

impl TransitionType {
    /// Maps a wire tag to its variant; unknown tags are an error, never a default.
    pub fn from_xml_element_name(name: &str) -> EwsResult<Self> {
        match name {
            names::TRANSITION => Ok(TransitionType::Transition),
            names::ABSOLUTE_DATE_TRANSITION => Ok(TransitionType::AbsoluteDate),
            names::RECURRING_DAY_TRANSITION => Ok(TransitionType::RecurringDay),
            names::RECURRING_DATE_TRANSITION => Ok(TransitionType::RecurringDate),
            other => Err(EwsError::UnknownTransitionType(other.to_string())),
        }
    }

    pub fn xml_element_name(&self) -> &'static str {
        match self {
            TransitionType::Transition => names::TRANSITION,
            TransitionType::AbsoluteDate => names::ABSOLUTE_DATE_TRANSITION,
            TransitionType::RecurringDay => names::RECURRING_DAY_TRANSITION,
            TransitionType::RecurringDate => names::RECURRING_DATE_TRANSITION,
        }
    }
}

/// Which occurrence of a weekday within a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekIndex {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekIndex {
    pub fn as_i8(&self) -> i8 {
        match self {
            WeekIndex::First => 1,
            WeekIndex::Second => 2,
            WeekIndex::Third => 3,
            WeekIndex::Fourth => 4,
            WeekIndex::Last => -1,
        }
    }

    fn from_i8(value: i8) -> Option<Self> {
        match value {
            1 => Some(WeekIndex::First),
            2 => Some(WeekIndex::Second),
            3 => Some(WeekIndex::Third),
            4 => Some(WeekIndex::Fourth),
            -1 => Some(WeekIndex::Last),
            _ => None,
        }
    }
}

/// Day of month, 1 through 31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayOfMonth(u8);

impl DayOfMonth {
    pub fn new(day: u8) -> EwsResult<Self> {
        if (1..=31).contains(&day) {
            Ok(DayOfMonth(day))
        } else {
            Err(EwsError::ArgumentOutOfRange {
                name: "day",
                value: day.into(),
                min: 1,
                max: 31,
            })
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

/// When a transition happens. One variant per transition element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionRule {
    /// `Transition`: no schedule of its own.
    Simple,
    /// `AbsoluteDateTransition`: once, at a fixed local date and time.
    AbsoluteDate { date_time: NaiveDateTime },
    /// `RecurringDayTransition`: yearly, on the Nth weekday of a month.
    RecurringDay {
        time_offset: TimeDelta,
        month: Month,
        day_of_week: Weekday,
        occurrence: WeekIndex,
    },
    /// `RecurringDateTransition`: yearly, on a fixed day of a month.
    RecurringDate {
        time_offset: TimeDelta,
        month: Month,
        day: DayOfMonth,
    },
}

impl TransitionRule {
    pub fn transition_type(&self) -> TransitionType {
        match self {
            TransitionRule::Simple => TransitionType::Transition,
            TransitionRule::AbsoluteDate { .. } => TransitionType::AbsoluteDate,
            TransitionRule::RecurringDay { .. } => TransitionType::RecurringDay,
            TransitionRule::RecurringDate { .. } => TransitionType::RecurringDate,
        }
    }

    fn read_from_xml(transition_type: TransitionType, node: Node<'_, '_>) -> EwsResult<Self> {
        match transition_type {
            TransitionType::Transition => Ok(TransitionRule::Simple),
            TransitionType::AbsoluteDate => {
                let text = xml::element_text(xml::required_child(node, names::DATE_TIME)?);
                let date_time = text
                    .parse::<NaiveDateTime>()
                    .map_err(|_| EwsError::invalid_value(names::DATE_TIME, text))?;
                Ok(TransitionRule::AbsoluteDate { date_time })
            }
            TransitionType::RecurringDay => {
                let day_of_week = read_weekday(node)?;
                let occurrence: i8 = xml::read_child_value(node, names::OCCURRENCE)?;
                let occurrence = WeekIndex::from_i8(occurrence).ok_or_else(|| {
                    EwsError::invalid_value(names::OCCURRENCE, &occurrence.to_string())
                })?;
                Ok(TransitionRule::RecurringDay {
                    time_offset: read_time_offset(node)?,
                    month: read_month(node)?,
                    day_of_week,
                    occurrence,
                })
            }
            TransitionType::RecurringDate => {
                let day: u8 = xml::read_child_value(node, names::DAY)?;
                let day = DayOfMonth::new(day)
                    .map_err(|_| EwsError::invalid_value(names::DAY, &day.to_string()))?;
                Ok(TransitionRule::RecurringDate {
                    time_offset: read_time_offset(node)?,
                    month: read_month(node)?,
                    day,
                })
            }
        }
    }

    /// Writes the rule's elements; `To` has already been written.
    fn write_elements(&self, writer: &mut EwsXmlWriter) -> EwsResult<()> {
        match self {
            TransitionRule::Simple => Ok(()),
            TransitionRule::AbsoluteDate { date_time } => writer.write_element_value(
                XmlNamespace::Types,
                names::DATE_TIME,
                date_time.format(DATE_TIME_FORMAT),
            ),
            TransitionRule::RecurringDay {
                time_offset,
                month,
                day_of_week,
                occurrence,
            } => {
                write_month_transition(writer, *time_offset, *month)?;
                writer.write_element_value(
                    XmlNamespace::Types,
                    names::DAY_OF_WEEK,
                    weekday_name(*day_of_week),
                )?;
                writer.write_element_value(
                    XmlNamespace::Types,
                    names::OCCURRENCE,
                    occurrence.as_i8(),
                )
            }
            TransitionRule::RecurringDate {
                time_offset,
                month,
                day,
            } => {
                write_month_transition(writer, *time_offset, *month)?;
                writer.write_element_value(XmlNamespace::Types, names::DAY, day.get())
            }
        }
    }
}

/// A single time zone transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeZoneTransition {
    target: TransitionTarget,
    rule: TransitionRule,
}

impl TimeZoneTransition {
    pub fn new(target: TransitionTarget, rule: TransitionRule) -> Self {
        TimeZoneTransition { target, rule }
    }

    /// A plain `Transition` to a period.
    pub fn to_period(period: &TimeZonePeriod) -> Self {
        Self::new(TransitionTarget::Period(period.id.clone()), TransitionRule::Simple)
    }

    /// A plain `Transition` to a transition group.
    pub fn to_group(group: &TimeZoneTransitionGroup) -> Self {
        Self::new(TransitionTarget::Group(group.id.clone()), TransitionRule::Simple)
    }

    pub fn target(&self) -> &TransitionTarget {
        &self.target
    }

    pub fn rule(&self) -> &TransitionRule {
        &self.rule
    }

    pub fn transition_type(&self) -> TransitionType {
        self.rule.transition_type()
    }

    pub fn xml_element_name(&self) -> &'static str {
        self.transition_type().xml_element_name()
    }

    /// The period this transition switches to, if it targets a period.
    pub fn target_period<'a>(
        &self,
        definition: &'a TimeZoneDefinition,
    ) -> Option<&'a TimeZonePeriod> {
        match &self.target {
            TransitionTarget::Period(id) => definition.period(id),
            TransitionTarget::Group(_) => None,
        }
    }

    /// The group this transition switches to, if it targets a group.
    pub fn target_group<'a>(
        &self,
        definition: &'a TimeZoneDefinition,
    ) -> Option<&'a TimeZoneTransitionGroup> {
        match &self.target {
            TransitionTarget::Group(id) => definition.transition_group(id),
            TransitionTarget::Period(_) => None,
        }
    }

    /// Decodes one transition element.
    ///
    /// The target must already be registered in `definition`; nothing is
    /// constructed when the tag, kind or id is rejected.
    pub(crate) fn read_from_xml(
        definition: &TimeZoneDefinition,
        node: Node<'_, '_>,
    ) -> EwsResult<Self> {
        let transition_type = TransitionType::from_xml_element_name(node.tag_name().name())?;
        let to = xml::required_child(node, names::TO)?;
        let target = TransitionTarget::read_from_xml(to, definition)?;
        let rule = TransitionRule::read_from_xml(transition_type, node)?;
        Ok(TimeZoneTransition { target, rule })
    }

    pub fn write_to_xml(&self, writer: &mut EwsXmlWriter) -> EwsResult<()> {
        writer.write_start_element(XmlNamespace::Types, self.xml_element_name())?;
        self.target.write_to_xml(writer)?;
        self.rule.write_elements(writer)?;
        writer.write_end_element()
    }
}

fn write_month_transition(
    writer: &mut EwsXmlWriter,
    time_offset: TimeDelta,
    month: Month,
) -> EwsResult<()> {
    writer.write_element_value(
        XmlNamespace::Types,
        names::TIME_OFFSET,
        xml::format_xs_duration(time_offset),
    )?;
    writer.write_element_value(XmlNamespace::Types, names::MONTH, month.number_from_month())
}

fn read_time_offset(node: Node<'_, '_>) -> EwsResult<TimeDelta> {
    xml::parse_xs_duration(xml::element_text(xml::required_child(node, names::TIME_OFFSET)?))
}

fn read_month(node: Node<'_, '_>) -> EwsResult<Month> {
    let month: u8 = xml::read_child_value(node, names::MONTH)?;
    Month::try_from(month).map_err(|_| EwsError::invalid_value(names::MONTH, &month.to_string()))
}

fn read_weekday(node: Node<'_, '_>) -> EwsResult<Weekday> {
    let text = xml::element_text(xml::required_child(node, names::DAY_OF_WEEK)?);
    let day = match text {
        "Sunday" => Weekday::Sun,
        "Monday" => Weekday::Mon,
        "Tuesday" => Weekday::Tue,
        "Wednesday" => Weekday::Wed,
        "Thursday" => Weekday::Thu,
        "Friday" => Weekday::Fri,
        "Saturday" => Weekday::Sat,
        other => return Err(EwsError::invalid_value(names::DAY_OF_WEEK, other)),
    };
    Ok(day)
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}
