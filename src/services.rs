//! Registration and admin API over the store.
//!
//! Public registration needs no session; everything else goes through an
//! admin session that lapses after a fixed lifetime.
use crate::consts::SESSION_LIFETIME;
use crate::db::{DBError, Database};
use crate::form::ValidForm;
use crate::models::{RecordID, Registration, SearchFilter};
use crate::utils::password_utils::{hash, verify};
use argon2::password_hash;
use log::{info, warn};
use std::time::{Duration, Instant};
use thiserror::Error;

pub struct Service {
    db: Database,
    session: Option<AdminSession>,
    session_lifetime: Duration,
}

struct AdminSession {
    login: String,
    started: Instant,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Este CPF já está cadastrado no sistema.")]
    CpfAlreadyRegistered,

    #[error("Sessão de administrador ausente ou expirada")]
    NotAuthenticated,

    #[error("Administrador já cadastrado")]
    AdminAlreadyExists,

    #[error("Login de administrador vazio")]
    EmptyLogin,

    #[error("Falha ao gerar o hash da senha: {0}")]
    Hashing(password_hash::Error),

    #[error(transparent)]
    DBError(DBError),
}

impl From<DBError> for ServiceError {
    fn from(err: DBError) -> Self {
        match err {
            DBError::CpfAlreadyRegistered { .. } => ServiceError::CpfAlreadyRegistered,
            other => ServiceError::DBError(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Login ou senha inválidos")]
    InvalidCredentials,
}

impl Service {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            session: None,
            session_lifetime: SESSION_LIFETIME,
        }
    }

    pub fn with_session_lifetime(mut self, lifetime: Duration) -> Self {
        self.session_lifetime = lifetime;
        self
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        self.db.save()
    }

    /// Public registration: refuses a known CPF, then hands out the next
    /// registration number.
    pub fn register(&mut self, form: ValidForm) -> Result<&Registration, ServiceError> {
        if self.db.lookup_cpf(&form.cpf).is_some() {
            warn!("Registration refused, CPF {} already registered", form.cpf);
            return Err(ServiceError::CpfAlreadyRegistered);
        }

        let registration_number = self.db.next_registration_number();
        let id = self.insert(form, registration_number)?;
        info!("New registration #{registration_number}");
        Ok(self.db.get(id)?)
    }

    fn insert(
        &mut self,
        form: ValidForm,
        registration_number: u64,
    ) -> Result<RecordID, ServiceError> {
        let ValidForm {
            name,
            phone,
            email,
            cpf,
        } = form;

        let id = RecordID::new();
        self.db.store(Registration {
            id,
            name,
            phone,
            email,
            cpf,
            registration_number,
        })?;
        Ok(id)
    }

    pub fn has_admins(&self) -> bool {
        self.db.has_admins()
    }

    /// Creates an admin account. The first one can be created freely, later
    /// ones need a live admin session.
    pub fn create_admin(&mut self, login: &str, password: &str) -> Result<(), ServiceError> {
        if self.db.has_admins() {
            self.require_admin()?;
        }

        let login = login.trim();
        if login.is_empty() {
            return Err(ServiceError::EmptyLogin);
        }
        if self.db.admin_hash(login).is_some() {
            return Err(ServiceError::AdminAlreadyExists);
        }

        let hashed = hash(password).map_err(ServiceError::Hashing)?;
        self.db.store_admin(login.to_owned(), hashed);
        info!("Admin account {login} created");
        Ok(())
    }

    /// Checks the credentials and opens an admin session
    pub fn login(&mut self, login: &str, password: &str) -> Result<(), LoginError> {
        let login = login.trim();
        if !verify(password, self.db.admin_hash(login)) {
            warn!("Failed admin login for {login}");
            return Err(LoginError::InvalidCredentials);
        }

        info!("Admin {login} logged in");
        self.session = Some(AdminSession {
            login: login.to_owned(),
            started: Instant::now(),
        });
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!("Admin {} logged out", session.login);
        }
    }

    /// Login of the admin with a live session, dropping an expired one
    pub fn current_admin(&mut self) -> Option<&str> {
        if self.require_admin().is_err() {
            self.session = None;
        }
        self.session.as_ref().map(|session| session.login.as_str())
    }

    fn require_admin(&self) -> Result<&str, ServiceError> {
        match &self.session {
            Some(session) if session.started.elapsed() < self.session_lifetime => {
                Ok(&session.login)
            }
            _ => Err(ServiceError::NotAuthenticated),
        }
    }

    /// Records matching a dashboard search, by registration number
    pub fn list(
        &self,
        filter: SearchFilter,
        term: &str,
    ) -> Result<Vec<&Registration>, ServiceError> {
        self.require_admin()?;

        Ok(self
            .db
            .list()
            .into_iter()
            .filter(|record| record.matches(filter, term))
            .collect())
    }

    /// Adds a record from the dashboard, with an explicit registration number
    /// or the next one in sequence
    pub fn add(
        &mut self,
        form: ValidForm,
        registration_number: Option<u64>,
    ) -> Result<&Registration, ServiceError> {
        let admin = self.require_admin()?.to_owned();

        let registration_number =
            registration_number.unwrap_or_else(|| self.db.next_registration_number());
        let id = self.insert(form, registration_number)?;
        info!("Admin {admin} added registration #{registration_number}");
        Ok(self.db.get(id)?)
    }

    pub fn update(
        &mut self,
        id: RecordID,
        form: ValidForm,
        registration_number: u64,
    ) -> Result<&Registration, ServiceError> {
        let admin = self.require_admin()?.to_owned();

        let mut updated = self.db.get(id)?.clone();
        updated.name = form.name;
        updated.phone = form.phone;
        updated.email = form.email;
        updated.cpf = form.cpf;
        updated.registration_number = registration_number;
        self.db.store(updated)?;

        info!("Admin {admin} updated registration {id}");
        Ok(self.db.get(id)?)
    }

    pub fn delete(&mut self, id: RecordID) -> Result<Registration, ServiceError> {
        let admin = self.require_admin()?.to_owned();

        let removed = self.db.remove(id)?;
        info!(
            "Admin {admin} deleted registration #{}",
            removed.registration_number
        );
        Ok(removed)
    }
}
