//! Tool Definitions
//!
//! Schema catalog for every tool the agent may call. The `modifies_canvas`
//! flag declared here is the single source of truth for the executor's
//! broadcast decision.

use std::collections::HashMap;

use social_canvas_core::{ParameterSchema, ToolDefinition};

/// Customer model sections writable through `update_customer_section`.
pub const CUSTOMER_SECTIONS: &[&str] = &[
    "customers",
    "jobs_to_be_done",
    "value_proposition",
    "solution",
];

/// Economic model sections writable through `update_economic_section`.
pub const ECONOMIC_SECTIONS: &[&str] = &["channels", "revenue", "costs", "advantage"];

/// Impact chain fields writable through `update_impact_field`.
pub const IMPACT_FIELDS: &[&str] = &[
    "issue",
    "participants",
    "activities",
    "outputs",
    "short_term_outcomes",
    "medium_term_outcomes",
    "long_term_outcomes",
    "impact",
];

/// All tool definitions in catalog order.
pub fn all_definitions() -> Vec<ToolDefinition> {
    vec![
        update_purpose(),
        update_customer_section(),
        update_economic_section(),
        update_impact_field(),
        update_key_metrics(),
        get_canvas(),
        get_venture_profile(),
        get_completion_status(),
        search_methodology(),
        search_examples(),
        search_knowledge_base(),
        get_thread_context(),
    ]
}

fn insert_content(properties: &mut HashMap<String, ParameterSchema>, description: &str) {
    properties.insert(
        "content".to_string(),
        ParameterSchema::string(Some(description)),
    );
}

/// update_purpose definition
pub fn update_purpose() -> ToolDefinition {
    let mut properties = HashMap::new();
    insert_content(
        &mut properties,
        "The venture's purpose statement. At least 20 characters.",
    );

    ToolDefinition {
        name: "update_purpose".to_string(),
        description: "Update the canvas purpose statement: why the venture exists. \
                      Content must be at least 20 characters."
            .to_string(),
        input_schema: ParameterSchema::object(
            Some("Purpose update parameters"),
            properties,
            vec!["content".to_string()],
        ),
        modifies_canvas: true,
    }
}

/// update_customer_section definition
pub fn update_customer_section() -> ToolDefinition {
    let mut properties = HashMap::new();
    properties.insert(
        "section".to_string(),
        ParameterSchema::string_enum(
            Some("Customer model section to update"),
            CUSTOMER_SECTIONS,
        ),
    );
    insert_content(&mut properties, "New section content. At least 20 characters.");

    ToolDefinition {
        name: "update_customer_section".to_string(),
        description: "Update a Customer model section. Sections complete in order: \
                      customers, then jobs_to_be_done, then value_proposition, then \
                      solution. Writing a section whose prerequisites are incomplete \
                      fails with the prerequisite named."
            .to_string(),
        input_schema: ParameterSchema::object(
            Some("Customer section update parameters"),
            properties,
            vec!["section".to_string(), "content".to_string()],
        ),
        modifies_canvas: true,
    }
}

/// update_economic_section definition
pub fn update_economic_section() -> ToolDefinition {
    let mut properties = HashMap::new();
    properties.insert(
        "section".to_string(),
        ParameterSchema::string_enum(
            Some("Economic model section to update"),
            ECONOMIC_SECTIONS,
        ),
    );
    insert_content(&mut properties, "New section content. At least 20 characters.");

    ToolDefinition {
        name: "update_economic_section".to_string(),
        description: "Update an Economic model section (channels, revenue, costs, \
                      advantage). Economic sections may be completed in any order."
            .to_string(),
        input_schema: ParameterSchema::object(
            Some("Economic section update parameters"),
            properties,
            vec!["section".to_string(), "content".to_string()],
        ),
        modifies_canvas: true,
    }
}

/// update_impact_field definition
pub fn update_impact_field() -> ToolDefinition {
    let mut properties = HashMap::new();
    properties.insert(
        "field".to_string(),
        ParameterSchema::string_enum(Some("Impact chain field to update"), IMPACT_FIELDS),
    );
    insert_content(&mut properties, "New field content. At least 10 characters.");

    ToolDefinition {
        name: "update_impact_field".to_string(),
        description: "Update a field of the impact causality chain. Fields complete \
                      strictly in order from issue to impact; a field can only be \
                      written once every earlier field is complete. The final impact \
                      field is also the impact cell of the canvas grid."
            .to_string(),
        input_schema: ParameterSchema::object(
            Some("Impact field update parameters"),
            properties,
            vec!["field".to_string(), "content".to_string()],
        ),
        modifies_canvas: true,
    }
}

/// update_key_metrics definition
pub fn update_key_metrics() -> ToolDefinition {
    let mut properties = HashMap::new();
    insert_content(
        &mut properties,
        "The key metrics description. At least 20 characters.",
    );

    ToolDefinition {
        name: "update_key_metrics".to_string(),
        description: "Update the canvas key metrics: the few numbers that show the \
                      venture is working. Content must be at least 20 characters."
            .to_string(),
        input_schema: ParameterSchema::object(
            Some("Key metrics update parameters"),
            properties,
            vec!["content".to_string()],
        ),
        modifies_canvas: true,
    }
}

/// get_canvas definition
pub fn get_canvas() -> ToolDefinition {
    ToolDefinition {
        name: "get_canvas".to_string(),
        description: "Read the full canvas: every section, the impact chain, and the \
                      overall completion percentage."
            .to_string(),
        input_schema: ParameterSchema::object(Some("No parameters"), HashMap::new(), vec![]),
        modifies_canvas: false,
    }
}

/// get_venture_profile definition
pub fn get_venture_profile() -> ToolDefinition {
    ToolDefinition {
        name: "get_venture_profile".to_string(),
        description: "Read the venture classification profile: stage, impact areas, \
                      mechanisms, revenue and funding sources, industries, and legal \
                      structure, each with confidence and confirmation."
            .to_string(),
        input_schema: ParameterSchema::object(Some("No parameters"), HashMap::new(), vec![]),
        modifies_canvas: false,
    }
}

/// get_completion_status definition
pub fn get_completion_status() -> ToolDefinition {
    ToolDefinition {
        name: "get_completion_status".to_string(),
        description: "Read the canvas completion summary: percentage, completed and \
                      missing sections, and guiding questions for the next section \
                      worth working on."
            .to_string(),
        input_schema: ParameterSchema::object(Some("No parameters"), HashMap::new(), vec![]),
        modifies_canvas: false,
    }
}

fn search_properties() -> HashMap<String, ParameterSchema> {
    let mut properties = HashMap::new();
    properties.insert(
        "query".to_string(),
        ParameterSchema::string(Some(
            "Search query describing the information you need. Be specific \
             for better semantic matching.",
        )),
    );
    properties.insert(
        "limit".to_string(),
        ParameterSchema::integer(Some("Number of results to return (default: 5, max: 20).")),
    );
    properties
}

/// search_methodology definition
pub fn search_methodology() -> ToolDefinition {
    ToolDefinition {
        name: "search_methodology".to_string(),
        description: "Search canvas methodology guides for how to work on a section. \
                      Results are filtered by the venture profile's reliable \
                      dimensions."
            .to_string(),
        input_schema: ParameterSchema::object(
            Some("Methodology search parameters"),
            search_properties(),
            vec!["query".to_string()],
        ),
        modifies_canvas: false,
    }
}

/// search_examples definition
pub fn search_examples() -> ToolDefinition {
    ToolDefinition {
        name: "search_examples".to_string(),
        description: "Search worked examples from comparable ventures. Results are \
                      filtered by the venture profile's reliable dimensions."
            .to_string(),
        input_schema: ParameterSchema::object(
            Some("Example search parameters"),
            search_properties(),
            vec!["query".to_string()],
        ),
        modifies_canvas: false,
    }
}

/// search_knowledge_base definition
pub fn search_knowledge_base() -> ToolDefinition {
    let mut properties = search_properties();
    properties.insert(
        "content_type".to_string(),
        ParameterSchema::string_enum(
            Some("Optional: restrict to one content type."),
            &["methodology", "examples"],
        ),
    );

    ToolDefinition {
        name: "search_knowledge_base".to_string(),
        description: "Search the whole knowledge base. Use search_methodology or \
                      search_examples when you already know which kind of content \
                      you need."
            .to_string(),
        input_schema: ParameterSchema::object(
            Some("Knowledge base search parameters"),
            properties,
            vec!["query".to_string()],
        ),
        modifies_canvas: false,
    }
}

/// get_thread_context definition
pub fn get_thread_context() -> ToolDefinition {
    let mut properties = HashMap::new();
    properties.insert(
        "thread_id".to_string(),
        ParameterSchema::string(Some("Identifier of the sibling conversation to read.")),
    );

    ToolDefinition {
        name: "get_thread_context".to_string(),
        description: "Read a summary of a sibling conversation's context. Read-only; \
                      cross-conversation state is never shared mutably."
            .to_string(),
        input_schema: ParameterSchema::object(
            Some("Thread context parameters"),
            properties,
            vec!["thread_id".to_string()],
        ),
        modifies_canvas: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_size_and_names() {
        let defs = all_definitions();
        assert_eq!(defs.len(), 12);
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert!(names.contains(&"update_impact_field"));
        assert!(names.contains(&"search_knowledge_base"));
        assert!(names.contains(&"get_thread_context"));
    }

    #[test]
    fn test_exactly_the_update_tools_are_mutating() {
        for def in all_definitions() {
            assert_eq!(
                def.modifies_canvas,
                def.name.starts_with("update_"),
                "{} has wrong modifies_canvas",
                def.name
            );
        }
    }

    #[test]
    fn test_update_tools_require_content() {
        for def in all_definitions().iter().filter(|d| d.modifies_canvas) {
            let required = def.input_schema.required.as_ref().unwrap();
            assert!(required.contains(&"content".to_string()), "{}", def.name);
        }
    }

    #[test]
    fn test_section_enums_match_rule_tables() {
        use crate::services::canvas::rules;
        let customer_names: Vec<&str> =
            rules::CUSTOMER_FIELDS.iter().map(|r| r.name).collect();
        assert_eq!(CUSTOMER_SECTIONS, customer_names.as_slice());

        let economic_names: Vec<&str> =
            rules::ECONOMIC_FIELDS.iter().map(|r| r.name).collect();
        assert_eq!(ECONOMIC_SECTIONS, economic_names.as_slice());

        let impact_names: Vec<&str> = rules::IMPACT_FIELDS.iter().map(|r| r.name).collect();
        assert_eq!(IMPACT_FIELDS, impact_names.as_slice());
    }

    #[test]
    fn test_definitions_serialize() {
        for def in all_definitions() {
            let json = serde_json::to_string(&def).unwrap();
            assert!(!json.is_empty());
        }
    }
}
