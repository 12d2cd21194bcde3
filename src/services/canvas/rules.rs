//! Validation Rule Tables
//!
//! The authoritative per-field rules for every canvas model: minimum
//! lengths, dependency edges, and guiding questions. Dependency lists are
//! declared per field, not inferred from chain order: the Economic model
//! deliberately breaks strict chaining, and a future field reordering may
//! too. Treat the edge lists below as the contract.

use crate::models::canvas::SECTION_MIN_LENGTH;
use crate::models::impact_chain::IMPACT_FIELD_MIN_LENGTH;

/// Validation rule for one field of a model.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Stable field identifier
    pub name: &'static str,
    /// Minimum trimmed content length for the field to count as complete
    pub min_length: usize,
    /// Fields that must be complete before this one may be written.
    /// Checked directly, never transitively.
    pub dependencies: &'static [&'static str],
    /// Canned guiding questions surfaced when this field is suggested next
    pub guiding_questions: &'static [&'static str],
}

/// Customer model: a strict chain declared as explicit per-field edges.
/// `solution` depends only on `value_proposition`; earlier links are not
/// re-checked there.
pub const CUSTOMER_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "customers",
        min_length: SECTION_MIN_LENGTH,
        dependencies: &[],
        guiding_questions: &[
            "Who are the people or organizations you serve?",
            "Which customer group feels the problem most acutely?",
            "Who pays, and who benefits, if they differ?",
        ],
    },
    FieldRule {
        name: "jobs_to_be_done",
        min_length: SECTION_MIN_LENGTH,
        dependencies: &["customers"],
        guiding_questions: &[
            "What are your customers trying to get done?",
            "What workarounds do they use today?",
        ],
    },
    FieldRule {
        name: "value_proposition",
        min_length: SECTION_MIN_LENGTH,
        dependencies: &["customers", "jobs_to_be_done"],
        guiding_questions: &[
            "Why would your customers choose you over the alternatives?",
            "Which job do you do meaningfully better?",
            "What outcome can you promise that others cannot?",
        ],
    },
    FieldRule {
        name: "solution",
        min_length: SECTION_MIN_LENGTH,
        dependencies: &["value_proposition"],
        guiding_questions: &[
            "What product or service delivers the value proposition?",
            "What is the smallest version that would still be useful?",
        ],
    },
];

/// Economic model: every field writable in any order.
pub const ECONOMIC_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "channels",
        min_length: SECTION_MIN_LENGTH,
        dependencies: &[],
        guiding_questions: &[
            "How do customers find out about you?",
            "How is the product or service delivered to them?",
        ],
    },
    FieldRule {
        name: "revenue",
        min_length: SECTION_MIN_LENGTH,
        dependencies: &[],
        guiding_questions: &[
            "Who pays, and for what exactly?",
            "Is the income earned, granted, or donated?",
            "How does revenue grow as impact grows?",
        ],
    },
    FieldRule {
        name: "costs",
        min_length: SECTION_MIN_LENGTH,
        dependencies: &[],
        guiding_questions: &[
            "What are the largest cost drivers?",
            "Which costs scale with each additional customer?",
        ],
    },
    FieldRule {
        name: "advantage",
        min_length: SECTION_MIN_LENGTH,
        dependencies: &[],
        guiding_questions: &[
            "What do you have that cannot easily be copied or bought?",
            "What gets stronger as you grow?",
        ],
    },
];

/// Impact model: the eight-field causality chain. Each field depends on
/// every field before it, written out explicitly.
pub const IMPACT_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "issue",
        min_length: IMPACT_FIELD_MIN_LENGTH,
        dependencies: &[],
        guiding_questions: &[
            "What social or environmental problem are you addressing?",
            "Who experiences this problem, and how severely?",
        ],
    },
    FieldRule {
        name: "participants",
        min_length: IMPACT_FIELD_MIN_LENGTH,
        dependencies: &["issue"],
        guiding_questions: &[
            "Who takes part in your activities?",
            "How do participants differ from paying customers?",
        ],
    },
    FieldRule {
        name: "activities",
        min_length: IMPACT_FIELD_MIN_LENGTH,
        dependencies: &["issue", "participants"],
        guiding_questions: &[
            "What will you actually do with participants?",
            "How often, and at what scale?",
        ],
    },
    FieldRule {
        name: "outputs",
        min_length: IMPACT_FIELD_MIN_LENGTH,
        dependencies: &["issue", "participants", "activities"],
        guiding_questions: &[
            "What countable things do the activities produce?",
            "What would you report after the first quarter?",
        ],
    },
    FieldRule {
        name: "short_term_outcomes",
        min_length: IMPACT_FIELD_MIN_LENGTH,
        dependencies: &["issue", "participants", "activities", "outputs"],
        guiding_questions: &[
            "What changes for participants within months?",
            "What early signal would show the approach works?",
        ],
    },
    FieldRule {
        name: "medium_term_outcomes",
        min_length: IMPACT_FIELD_MIN_LENGTH,
        dependencies: &[
            "issue",
            "participants",
            "activities",
            "outputs",
            "short_term_outcomes",
        ],
        guiding_questions: &[
            "What changes hold one to three years in?",
            "How do early outcomes compound?",
        ],
    },
    FieldRule {
        name: "long_term_outcomes",
        min_length: IMPACT_FIELD_MIN_LENGTH,
        dependencies: &[
            "issue",
            "participants",
            "activities",
            "outputs",
            "short_term_outcomes",
            "medium_term_outcomes",
        ],
        guiding_questions: &[
            "What lasting change do you expect after several years?",
            "What would participants' lives look like then?",
        ],
    },
    FieldRule {
        name: "impact",
        min_length: IMPACT_FIELD_MIN_LENGTH,
        dependencies: &[
            "issue",
            "participants",
            "activities",
            "outputs",
            "short_term_outcomes",
            "medium_term_outcomes",
            "long_term_outcomes",
        ],
        guiding_questions: &[
            "What is the ultimate change in the world you are working toward?",
            "How would the issue statement read once you succeed?",
        ],
    },
];

/// Standalone sections validated by the aggregate directly.
pub const STANDALONE_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "purpose",
        min_length: SECTION_MIN_LENGTH,
        dependencies: &[],
        guiding_questions: &[
            "Why does this venture exist?",
            "What would be lost if it disappeared tomorrow?",
        ],
    },
    FieldRule {
        name: "key_metrics",
        min_length: SECTION_MIN_LENGTH,
        dependencies: &[],
        guiding_questions: &[
            "Which few numbers tell you the venture is working?",
            "What do you check weekly, and what yearly?",
        ],
    },
];

/// Look up a rule by field name within a table.
pub fn find_rule<'a>(fields: &'a [FieldRule], name: &str) -> Option<&'a FieldRule> {
    fields.iter().find(|r| r.name == name)
}
