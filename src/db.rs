//! In-memory registration store, saved as JSON

use crate::{
    models::{RecordID, Registration},
    utils::{input_validation::Cpf, password_utils::PWHash},
};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs::File,
    io::{self, ErrorKind::NotFound},
    path::PathBuf,
};
use thiserror::Error;

#[derive(Serialize, Deserialize, Default)]
pub struct Database {
    #[serde(skip)]
    path: Option<PathBuf>,
    records: HashMap<RecordID, Registration>,
    #[serde(default)]
    next_registration_number: u64,
    #[serde(default)]
    admins: HashMap<String, PWHash>,
}

#[derive(Debug, Error)]
pub enum DBError {
    #[error("Invalid record ID: {0}")]
    InvalidRecordID(RecordID),
    #[error("CPF already registered: {cpf}")]
    CpfAlreadyRegistered { cpf: Cpf },
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self, io::Error> {
        match File::open(&path) {
            Ok(f) => {
                let mut db: Self = serde_json::from_reader(f)?;
                db.resync_sequence();
                db.path = Some(path);
                Ok(db)
            }

            // Missing file: start empty and write it right away
            Err(not_found) if not_found.kind() == NotFound => {
                info!("DB file {} not found, creating new empty DB", path.display());
                let new_db = Database {
                    path: Some(path),
                    ..Database::default()
                };
                new_db.save()?;
                Ok(new_db)
            }

            Err(other) => Err(other),
        }
    }

    pub fn save(&self) -> Result<(), io::Error> {
        if let Some(path) = &self.path {
            let file = File::create(path)?;
            serde_json::to_writer_pretty(file, self)?;
        }
        Ok(())
    }

    pub fn get(&self, id: RecordID) -> Result<&Registration, DBError> {
        self.records.get(&id).ok_or(DBError::InvalidRecordID(id))
    }

    pub fn lookup_cpf(&self, cpf: &Cpf) -> Option<&Registration> {
        self.records.values().find(|record| &record.cpf == cpf)
    }

    /// Number the next registration will get. Starts at 1 and never goes back,
    /// even when records are deleted.
    pub fn next_registration_number(&self) -> u64 {
        self.next_registration_number.max(1)
    }

    /// Moves the sequence past every stored number, for files written without
    /// a counter or edited by hand
    fn resync_sequence(&mut self) {
        let past_stored = self
            .records
            .values()
            .map(|record| record.registration_number.saturating_add(1))
            .max()
            .unwrap_or(1);
        self.next_registration_number = self.next_registration_number().max(past_stored);
    }

    /// Stores a record, refusing a CPF held by another record
    pub fn store(&mut self, record: Registration) -> Result<(), DBError> {
        if let Some(existing) = self.lookup_cpf(&record.cpf) {
            if existing.id != record.id {
                return Err(DBError::CpfAlreadyRegistered { cpf: record.cpf });
            }
        }

        self.next_registration_number = self
            .next_registration_number()
            .max(record.registration_number.saturating_add(1));
        self.records.insert(record.id, record);
        Ok(())
    }

    pub fn remove(&mut self, id: RecordID) -> Result<Registration, DBError> {
        self.records.remove(&id).ok_or(DBError::InvalidRecordID(id))
    }

    /// All records, by registration number
    pub fn list(&self) -> Vec<&Registration> {
        let mut records: Vec<&Registration> = self.records.values().collect();
        records.sort_by_key(|record| record.registration_number);
        records
    }

    pub fn has_admins(&self) -> bool {
        !self.admins.is_empty()
    }

    pub fn admin_hash(&self, login: &str) -> Option<&PWHash> {
        self.admins.get(login)
    }

    pub fn store_admin(&mut self, login: String, hash: PWHash) {
        self.admins.insert(login, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::input_validation::{Email, FullName, Phone};

    fn record(cpf: &str, registration_number: u64) -> Registration {
        Registration {
            id: RecordID::new(),
            name: FullName::try_from("Ana Costa").unwrap(),
            phone: Phone::try_from("21987654321").unwrap(),
            email: Email::try_from("ana@example.com").unwrap(),
            cpf: Cpf::try_from(cpf).unwrap(),
            registration_number,
        }
    }

    #[test]
    fn test_sequence_starts_at_one() {
        assert_eq!(Database::default().next_registration_number(), 1);
    }

    #[test]
    fn test_sequence_follows_stored_numbers() {
        let mut db = Database::default();
        db.store(record("52998224725", 1)).unwrap();
        assert_eq!(db.next_registration_number(), 2);

        db.store(record("11144477735", 10)).unwrap();
        assert_eq!(db.next_registration_number(), 11);

        // A lower explicit number does not rewind the sequence
        db.store(record("98765432100", 3)).unwrap();
        assert_eq!(db.next_registration_number(), 11);
    }

    #[test]
    fn test_sequence_survives_removal() {
        let mut db = Database::default();
        let first = record("52998224725", 1);
        let id = first.id;
        db.store(first).unwrap();
        db.remove(id).unwrap();
        assert_eq!(db.next_registration_number(), 2);
    }

    #[test]
    fn test_duplicate_cpf_is_refused() {
        let mut db = Database::default();
        db.store(record("52998224725", 1)).unwrap();

        let err = db.store(record("529.982.247-25", 2)).unwrap_err();
        assert!(matches!(err, DBError::CpfAlreadyRegistered { .. }));
        assert_eq!(db.list().len(), 1);
    }

    #[test]
    fn test_restoring_same_record_is_allowed() {
        let mut db = Database::default();
        let mut first = record("52998224725", 1);
        db.store(first.clone()).unwrap();

        first.registration_number = 5;
        db.store(first).unwrap();
        assert_eq!(db.list().len(), 1);
        assert_eq!(db.list()[0].registration_number, 5);
    }

    #[test]
    fn test_list_is_sorted() {
        let mut db = Database::default();
        db.store(record("52998224725", 7)).unwrap();
        db.store(record("11144477735", 2)).unwrap();
        db.store(record("98765432100", 4)).unwrap();

        let numbers: Vec<u64> = db.list().iter().map(|r| r.registration_number).collect();
        assert_eq!(numbers, vec![2, 4, 7]);
    }

    #[test]
    fn test_unknown_record() {
        let mut db = Database::default();
        let id = RecordID::new();
        assert!(matches!(db.get(id), Err(DBError::InvalidRecordID(_))));
        assert!(matches!(db.remove(id), Err(DBError::InvalidRecordID(_))));
    }

    #[test]
    fn test_missing_counter_follows_stored_numbers() {
        let mut db = Database::default();
        db.store(record("52998224725", 8)).unwrap();
        db.store(record("11144477735", 3)).unwrap();

        let mut json = serde_json::to_value(&db).unwrap();
        json.as_object_mut().unwrap().remove("next_registration_number");

        let mut back: Database = serde_json::from_value(json).unwrap();
        assert_eq!(back.next_registration_number(), 1);
        back.resync_sequence();
        assert_eq!(back.next_registration_number(), 9);
    }

    #[test]
    fn test_open_resyncs_sequence() {
        let path = std::env::temp_dir().join(format!("cadastro-{}.json", RecordID::new()));
        let mut db = Database::default();
        db.store(record("52998224725", 5)).unwrap();
        let mut json = serde_json::to_value(&db).unwrap();
        json["next_registration_number"] = serde_json::json!(0);
        std::fs::write(&path, json.to_string()).unwrap();

        let opened = Database::open(path.clone()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(opened.next_registration_number(), 6);
    }

    #[test]
    fn test_json_round_trip_keeps_sequence() {
        let mut db = Database::default();
        db.store(record("52998224725", 3)).unwrap();

        let json = serde_json::to_string(&db).unwrap();
        let back: Database = serde_json::from_str(&json).unwrap();
        assert_eq!(back.next_registration_number(), 4);
        assert!(back.lookup_cpf(&Cpf::try_from("52998224725").unwrap()).is_some());
    }
}
