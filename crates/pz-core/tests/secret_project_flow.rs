//! End-to-end flows over the core: project creation, entry writes,
//! protected fetch and plaintext materialization, without any network.

use std::cell::RefCell;

use pz_core::envfile::{parse_env, to_env};
use pz_core::project::{placeholder_entry, SecretProject, Visibility};
use pz_core::protocol::{fetch_protected, ProtectedResource};
use pz_core::{PzError, SecretSet, SecretValue};

/// In-memory stand-in for the collaborator store. Private projects are
/// only served through `unlock`, mirroring the server's 403 behavior.
struct MemoryStore {
    project: RefCell<SecretProject>,
}

impl MemoryStore {
    fn new(name: &str, visibility: Visibility, password: Option<&str>) -> Self {
        let project = SecretProject {
            id: "p-1".to_string(),
            name: name.to_string(),
            visibility,
            entries: vec![placeholder_entry(visibility, password).expect("placeholder")],
            updated_at: None,
        };
        Self {
            project: RefCell::new(project),
        }
    }

    fn replace_entries(&self, entries: Vec<pz_core::SecretEntry>) {
        self.project.borrow_mut().entries = entries;
    }
}

impl ProtectedResource for MemoryStore {
    type Payload = SecretProject;

    fn fetch(&self) -> pz_core::Result<SecretProject> {
        let project = self.project.borrow();
        if project.visibility.is_private() {
            return Err(PzError::AccessDenied);
        }
        Ok(project.clone())
    }

    fn unlock(&self, _password: &str) -> pz_core::Result<SecretProject> {
        // The store hands back the payload regardless of what the
        // password was; decryption is where mistakes surface.
        Ok(self.project.borrow().clone())
    }
}

#[test]
fn test_private_project_set_and_view() {
    let store = MemoryStore::new("api-creds", Visibility::Private, Some("pw1"));

    // Write: fetch (unlock), set one key, replace the full collection.
    let access = fetch_protected(&store, || Ok("pw1".to_string())).expect("fetch should succeed");
    let project = access.payload().clone();
    let mut set = SecretSet::from_entries(project.entries);
    set.set("API_KEY", "sk-123", project.visibility, access.password())
        .expect("set should succeed");
    store.replace_entries(set.into_entries());

    // Read back with the right password.
    let access = fetch_protected(&store, || Ok("pw1".to_string())).expect("fetch should succeed");
    let project = access.payload().clone();
    let set = SecretSet::from_entries(project.entries);
    let view = set
        .plaintext_view(project.visibility, access.password())
        .expect("view should succeed");

    assert_eq!(view.len(), 1);
    assert_eq!(
        view.get("API_KEY"),
        Some(&SecretValue::Plain("sk-123".to_string()))
    );

    // Wrong password: the unlock succeeds but decryption degrades.
    let access =
        fetch_protected(&store, || Ok("wrong-pw".to_string())).expect("unlock always succeeds");
    let project = access.payload().clone();
    let set = SecretSet::from_entries(project.entries);
    let view = set
        .plaintext_view(project.visibility, access.password())
        .expect("bulk view never aborts");
    assert_eq!(view.get("API_KEY"), Some(&SecretValue::Undecryptable));
}

#[test]
fn test_public_project_is_served_open() {
    let store = MemoryStore::new("shared", Visibility::Public, None);

    let access = fetch_protected(&store, || {
        panic!("public project must not ask for a password")
    })
    .expect("fetch should succeed");

    assert!(access.password().is_none());
    let project = access.payload();
    assert_eq!(project.visibility, Visibility::Public);
}

#[test]
fn test_env_import_export_round_trip_through_project() {
    let store = MemoryStore::new("env-project", Visibility::Private, Some("pw"));

    let pairs = parse_env("FOO=bar\n#comment\n\nBAZ=qux").expect("parse should succeed");

    let access = fetch_protected(&store, || Ok("pw".to_string())).expect("fetch should succeed");
    let project = access.payload().clone();
    let mut set = SecretSet::from_entries(project.entries);
    set.merge(&pairs, project.visibility, access.password())
        .expect("merge should succeed");
    store.replace_entries(set.into_entries());

    let access = fetch_protected(&store, || Ok("pw".to_string())).expect("fetch should succeed");
    let project = access.payload().clone();
    let set = SecretSet::from_entries(project.entries);
    let view = set
        .plaintext_view(project.visibility, access.password())
        .expect("view should succeed");

    assert_eq!(to_env(&view.plain_pairs()), "FOO=bar\nBAZ=qux");
}

#[test]
fn test_project_wire_round_trip_preserves_records() {
    let store = MemoryStore::new("wire", Visibility::Private, Some("pw"));
    let access = fetch_protected(&store, || Ok("pw".to_string())).expect("fetch should succeed");
    let project = access.payload().clone();
    let mut set = SecretSet::from_entries(project.entries.clone());
    set.set("TOKEN", "t-42", project.visibility, access.password())
        .expect("set should succeed");

    let mut project = project;
    project.entries = set.into_entries();

    // Serialize as the store would and read it back: the record must
    // still decrypt, proving no bytes were disturbed in transit.
    let json = serde_json::to_string(&project).expect("serialize");
    let restored: SecretProject = serde_json::from_str(&json).expect("deserialize");

    let set = SecretSet::from_entries(restored.entries);
    let view = set
        .plaintext_view(restored.visibility, Some("pw"))
        .expect("view should succeed");
    assert_eq!(
        view.get("TOKEN"),
        Some(&SecretValue::Plain("t-42".to_string()))
    );
}
