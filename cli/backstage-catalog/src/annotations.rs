//! Well-known annotations with defined semantics.
//!
//! See <https://backstage.io/docs/features/software-catalog/well-known-annotations>

use std::collections::BTreeMap;

pub const MANAGED_BY_LOCATION: &str = "backstage.io/managed-by-location";
pub const MANAGED_BY_ORIGIN_LOCATION: &str = "backstage.io/managed-by-origin-location";
pub const ORPHAN: &str = "backstage.io/orphan";
pub const TECHDOCS_REF: &str = "backstage.io/techdocs-ref";
pub const VIEW_URL: &str = "backstage.io/view-url";
pub const EDIT_URL: &str = "backstage.io/edit-url";
pub const SOURCE_LOCATION: &str = "backstage.io/source-location";
pub const GITHUB_PROJECT_SLUG: &str = "github.com/project-slug";
pub const GITHUB_TEAM_SLUG: &str = "github.com/team-slug";
pub const GITHUB_USER_LOGIN: &str = "github.com/user-login";

type Slot = fn(&mut WellKnownAnnotations) -> &mut Option<String>;

/// Annotation key to the field it populates.
const SLOTS: [(&str, Slot); 10] = [
    (MANAGED_BY_LOCATION, |a| &mut a.managed_by_location),
    (MANAGED_BY_ORIGIN_LOCATION, |a| &mut a.managed_by_origin_location),
    (ORPHAN, |a| &mut a.orphan),
    (TECHDOCS_REF, |a| &mut a.techdocs_ref),
    (VIEW_URL, |a| &mut a.view_url),
    (EDIT_URL, |a| &mut a.edit_url),
    (SOURCE_LOCATION, |a| &mut a.source_location),
    (GITHUB_PROJECT_SLUG, |a| &mut a.github_project_slug),
    (GITHUB_TEAM_SLUG, |a| &mut a.github_team_slug),
    (GITHUB_USER_LOGIN, |a| &mut a.github_user_login),
];

/// The recognized subset of an entity's annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WellKnownAnnotations {
    /// Location reference (`<type>:<target>`) of the source the entity was
    /// fetched from. Added by the catalog, the target may contain colons.
    pub managed_by_location: Option<String>,
    /// Location whose registration led to the creation of the entity.
    /// Usually equal to `managed_by_location` unless a location delegates.
    pub managed_by_origin_location: Option<String>,
    /// Set to `"true"` by the catalog on entities no location keeps alive.
    pub orphan: Option<String>,
    /// Where TechDocs sources are stored, relative to the descriptor file or
    /// as an absolute location reference.
    pub techdocs_ref: Option<String>,
    /// Canonical metadata file governing the entity.
    pub view_url: Option<String>,
    /// Source file of the entity metadata.
    pub edit_url: Option<String>,
    /// Location of the entity's source code. Folders end with `/`.
    pub source_location: Option<String>,
    /// `<owner>/<repository>` on GitHub.
    pub github_project_slug: Option<String>,
    /// `<organization>/<team>` on GitHub.
    pub github_team_slug: Option<String>,
    /// GitHub login of a user.
    pub github_user_login: Option<String>,
}

impl WellKnownAnnotations {
    /// Pick the recognized keys out of `annotations`, ignoring all others.
    pub fn from_annotations(annotations: &BTreeMap<String, String>) -> Self {
        let mut well_known = Self::default();
        for (key, slot) in SLOTS {
            if let Some(value) = annotations.get(key) {
                *slot(&mut well_known) = Some(value.clone());
            }
        }
        well_known
    }

    pub fn is_orphan(&self) -> bool {
        self.orphan.as_deref() == Some("true")
    }
}
