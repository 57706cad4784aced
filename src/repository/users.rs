use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::records::{USER_CSV_HEADER, USERS_SOURCE_ID};
use crate::data::UserRecord;
use crate::errors::RosterError;
use crate::repository::{UserRepository, find_by_id, load_all};
use crate::source::CsvRecordSource;
use crate::types::RecordId;

/// User collection stored as a CSV file with a header row.
pub struct CsvUserRepository {
    path: PathBuf,
}

impl CsvUserRepository {
    /// Repository over the CSV file at `path`; the file may not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persistence_error(&self, err: impl std::fmt::Display) -> RosterError {
        RosterError::Persistence(format!(
            "error writing users to '{}': {err}",
            self.path.display()
        ))
    }
}

impl UserRepository for CsvUserRepository {
    fn save_users(&self, users: &[UserRecord]) -> Result<(), RosterError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| self.persistence_error(err))?;
        }
        let mut writer =
            csv::Writer::from_path(&self.path).map_err(|err| self.persistence_error(err))?;
        writer
            .write_record(USER_CSV_HEADER)
            .map_err(|err| self.persistence_error(err))?;
        for user in users {
            writer
                .write_record(user.to_row())
                .map_err(|err| self.persistence_error(err))?;
        }
        writer.flush().map_err(|err| self.persistence_error(err))?;
        debug!(
            path = %self.path.display(),
            users = users.len(),
            "persisted user collection"
        );
        Ok(())
    }

    fn users(&self) -> Result<Vec<UserRecord>, RosterError> {
        load_all(CsvRecordSource::open_as(USERS_SOURCE_ID, &self.path)?)
    }

    fn user_by_id(&self, id: RecordId) -> Result<Option<UserRecord>, RosterError> {
        Ok(find_by_id(self.users()?, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: RecordId, first: &str, last: &str) -> UserRecord {
        UserRecord {
            id,
            email: format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
            first_name: first.into(),
            last_name: last.into(),
            avatar: format!("https://reqres.in/img/faces/{id}-image.jpg"),
        }
    }

    #[test]
    fn saved_users_can_be_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CsvUserRepository::new(dir.path().join("nested").join("users.csv"));
        let users = vec![user(1, "George", "Bluth"), user(2, "Janet", "Weaver")];
        repo.save_users(&users).unwrap();

        let text = fs::read_to_string(repo.path()).unwrap();
        assert!(text.starts_with("Id,Email,FirstName,LastName,Avatar\n"));
        assert_eq!(repo.users().unwrap(), users);
        assert_eq!(repo.user_by_id(2).unwrap().unwrap().first_name, "Janet");
        assert!(repo.user_by_id(9).unwrap().is_none());
    }

    #[test]
    fn save_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CsvUserRepository::new(dir.path().join("users.csv"));
        repo.save_users(&[user(1, "George", "Bluth")]).unwrap();
        repo.save_users(&[user(3, "Emma", "Wong")]).unwrap();
        let ids: Vec<RecordId> = repo.users().unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn save_into_a_directory_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CsvUserRepository::new(dir.path());
        assert!(matches!(
            repo.save_users(&[user(1, "George", "Bluth")]),
            Err(RosterError::Persistence(_))
        ));
    }

    #[test]
    fn missing_collection_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CsvUserRepository::new(dir.path().join("users.csv"));
        assert!(matches!(
            repo.users(),
            Err(RosterError::SourceUnavailable { .. })
        ));
    }
}
