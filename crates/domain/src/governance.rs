use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Resource-type classifier attached to a resource scope.
///
/// The set is closed: origin systems outside it are never matched but are not
/// rejected either, see [`OriginSystem::from_wire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OriginSystem {
    /// Enterprise application (service principal).
    AadApplication,
    /// Entra ID security or Microsoft 365 group.
    AadGroup,
    /// SharePoint Online site.
    SharePointOnline,
}

impl OriginSystem {
    /// Returns the tag used by the directory service.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AadApplication => "AadApplication",
            Self::AadGroup => "AadGroup",
            Self::SharePointOnline => "SharePointOnline",
        }
    }

    /// Maps a directory tag to a known origin system.
    ///
    /// Comparison is exact; unknown tags yield `None`.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "AadApplication" => Some(Self::AadApplication),
            "AadGroup" => Some(Self::AadGroup),
            "SharePointOnline" => Some(Self::SharePointOnline),
            _ => None,
        }
    }
}

impl Display for OriginSystem {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Resource instance referenced by a resource role scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceScope {
    origin_id: String,
    origin_system: String,
    display_name: Option<String>,
}

impl ResourceScope {
    /// Creates a scope snapshot as returned by the directory.
    #[must_use]
    pub fn new(
        origin_id: impl Into<String>,
        origin_system: impl Into<String>,
        display_name: Option<String>,
    ) -> Self {
        Self {
            origin_id: origin_id.into(),
            origin_system: origin_system.into(),
            display_name,
        }
    }

    /// Returns the identifier of the resource inside its origin system.
    #[must_use]
    pub fn origin_id(&self) -> &str {
        self.origin_id.as_str()
    }

    /// Returns the raw origin system tag.
    #[must_use]
    pub fn origin_system(&self) -> &str {
        self.origin_system.as_str()
    }

    /// Returns the known origin system, if the tag is recognized.
    #[must_use]
    pub fn known_origin_system(&self) -> Option<OriginSystem> {
        OriginSystem::from_wire(self.origin_system.as_str())
    }

    /// Returns the resource display name, if present.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}

/// Association of a resource instance with a grantable role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRoleScope {
    scope: Option<ResourceScope>,
    role_name: Option<String>,
}

impl ResourceRoleScope {
    /// Creates a resource role scope.
    #[must_use]
    pub fn new(scope: Option<ResourceScope>, role_name: Option<String>) -> Self {
        Self { scope, role_name }
    }

    /// Returns the scoped resource, if the directory expanded it.
    #[must_use]
    pub fn scope(&self) -> Option<&ResourceScope> {
        self.scope.as_ref()
    }

    /// Returns the role display name, if present.
    #[must_use]
    pub fn role_name(&self) -> Option<&str> {
        self.role_name.as_deref()
    }
}

/// Governance bundle of resource grants that users can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPackage {
    id: String,
    display_name: String,
    resource_role_scopes: Vec<ResourceRoleScope>,
}

impl AccessPackage {
    /// Creates an access package snapshot.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        resource_role_scopes: Vec<ResourceRoleScope>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            resource_role_scopes,
        }
    }

    /// Returns the opaque package identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the package display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns resource role scopes in directory order.
    #[must_use]
    pub fn resource_role_scopes(&self) -> &[ResourceRoleScope] {
        self.resource_role_scopes.as_slice()
    }
}

/// Catalog entry carrying only the projection used to enumerate packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPackageSummary {
    /// Opaque package identifier.
    pub id: String,
    /// Package display name.
    pub display_name: String,
}
