//! Concept messages.
//!
//! A concept is referenced on the wire by its identifier and declared base
//! type. Anything beyond that (its label, for instance) is fetched with a
//! [`ConceptMethod`] sent on the same transaction stream.

/// Empty payload used to select a concept method without arguments.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Unit {}

/// Engine-assigned concept identifier.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct ConceptId {
    /// Identifier value
    #[prost(string, tag = "1")]
    pub value: ::prost::alloc::string::String,
}

impl ConceptId {
    /// Create a concept identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Human-readable type label.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Label {
    /// Label value
    #[prost(string, tag = "1")]
    pub value: ::prost::alloc::string::String,
}

impl Label {
    /// Create a label.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Declared kind of a concept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum BaseType {
    /// Entity instance
    Entity = 0,
    /// Relationship instance
    Relationship = 1,
    /// Attribute instance
    Attribute = 2,
    /// Entity type
    EntityType = 3,
    /// Relationship type
    RelationshipType = 4,
    /// Attribute type
    AttributeType = 5,
    /// Role
    Role = 6,
    /// Rule
    Rule = 7,
    /// Meta type (`concept`, `thing`, ...)
    MetaType = 8,
}

impl BaseType {
    /// Whether concepts of this kind carry a label that the driver resolves.
    ///
    /// Instances have no label, and the engine does not answer label lookups
    /// for meta types.
    pub fn has_label(self) -> bool {
        matches!(
            self,
            BaseType::RelationshipType
                | BaseType::AttributeType
                | BaseType::EntityType
                | BaseType::Role
                | BaseType::Rule
        )
    }

    /// Get the base type name for logging.
    pub fn name(self) -> &'static str {
        match self {
            BaseType::Entity => "ENTITY",
            BaseType::Relationship => "RELATIONSHIP",
            BaseType::Attribute => "ATTRIBUTE",
            BaseType::EntityType => "ENTITY_TYPE",
            BaseType::RelationshipType => "RELATIONSHIP_TYPE",
            BaseType::AttributeType => "ATTRIBUTE_TYPE",
            BaseType::Role => "ROLE",
            BaseType::Rule => "RULE",
            BaseType::MetaType => "META_TYPE",
        }
    }
}

/// A concept as bound in a query answer.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Concept {
    /// Concept identifier
    #[prost(message, optional, tag = "1")]
    pub id: ::core::option::Option<ConceptId>,
    /// Declared base type
    #[prost(enumeration = "BaseType", tag = "2")]
    pub base_type: i32,
}

impl Concept {
    /// Create a concept reference.
    pub fn new(id: impl Into<String>, base_type: BaseType) -> Self {
        Self {
            id: Some(ConceptId::new(id)),
            base_type: base_type as i32,
        }
    }
}

/// A method to run against a single concept.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConceptMethod {
    /// Selected method
    #[prost(oneof = "concept_method::Method", tags = "1")]
    pub method: ::core::option::Option<concept_method::Method>,
}

impl ConceptMethod {
    /// The `getLabel` method.
    pub fn get_label() -> Self {
        Self {
            method: Some(concept_method::Method::GetLabel(Unit {})),
        }
    }
}

/// Nested types for [`ConceptMethod`].
pub mod concept_method {
    /// Concept method selector.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Method {
        /// Fetch the concept's label
        #[prost(message, tag = "1")]
        GetLabel(super::Unit),
    }
}

/// Answer to a [`ConceptMethod`].
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConceptResponse {
    /// Returned value
    #[prost(oneof = "concept_response::Value", tags = "1")]
    pub value: ::core::option::Option<concept_response::Value>,
}

impl ConceptResponse {
    /// A label answer.
    pub fn label(value: impl Into<String>) -> Self {
        Self {
            value: Some(concept_response::Value::Label(Label::new(value))),
        }
    }
}

/// Nested types for [`ConceptResponse`].
pub mod concept_response {
    /// Concept method result.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Value {
        /// Label of the concept
        #[prost(message, tag = "1")]
        Label(super::Label),
    }
}
