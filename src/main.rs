use anyhow::{anyhow, Result};
use cadastro::config::Settings;
use cadastro::db::Database;
use cadastro::form::{RegistrationForm, ValidForm};
use cadastro::models::{RecordID, Registration, SearchFilter};
use cadastro::services::Service;
use cadastro::utils::validators::{format_cpf, format_phone};
use derive_more::Display;
use inquire::{Confirm, Password, Select, Text};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

type MenuExit = Option<()>;
const MENU_EXIT: MenuExit = None;
const MENU_LOOP: MenuExit = Some(());

/// A text menu
trait Menu {
    /// Runs the menu once. Returns None when the menu is done,
    /// Some(()) to run it again.
    fn enter(&mut self) -> Result<MenuExit>;

    /// Runs the menu until it exits, reporting errors along the way
    fn enter_loop(&mut self) {
        while let Some(result) = self.enter().transpose() {
            if let Err(error) = result {
                eprintln!("Erro: {error}");
            }
        }
    }
}

/// Prompts every form field, masking phone and CPF as they are echoed back
fn prompt_form(initial: Option<&Registration>) -> Result<RegistrationForm> {
    let name = initial.map(|r| r.name.to_string()).unwrap_or_default();
    let phone = initial.map(|r| r.phone.to_string()).unwrap_or_default();
    let email = initial.map(|r| r.email.to_string()).unwrap_or_default();
    let cpf = initial.map(|r| r.cpf.to_string()).unwrap_or_default();

    Ok(RegistrationForm {
        name: Text::new("Nome completo:")
            .with_initial_value(&name)
            .prompt()?,
        phone: Text::new("Celular:")
            .with_initial_value(&phone)
            .with_placeholder("(11) 99999-9999")
            .with_formatter(&format_phone)
            .prompt()?,
        email: Text::new("Email:").with_initial_value(&email).prompt()?,
        cpf: Text::new("CPF:")
            .with_initial_value(&cpf)
            .with_placeholder("000.000.000-00")
            .with_formatter(&format_cpf)
            .prompt()?,
    })
}

/// Prompts until the form passes validation, or the user gives up
fn prompt_valid_form(initial: Option<&Registration>) -> Result<Option<ValidForm>> {
    loop {
        match prompt_form(initial)?.validate() {
            Ok(form) => return Ok(Some(form)),
            Err(errors) => {
                for error in &errors.errors {
                    eprintln!("[!] {}: {}", error.field, error.message);
                }
                if !Confirm::new("Corrigir e tentar novamente?")
                    .with_default(true)
                    .prompt()?
                {
                    return Ok(None);
                }
            }
        }
    }
}

fn prompt_registration_number(default: Option<u64>) -> Result<Option<u64>> {
    let initial = default.map(|n| n.to_string()).unwrap_or_default();
    let answer = Text::new("Número de registro:")
        .with_initial_value(&initial)
        .with_help_message("Deixe vazio para usar o próximo número")
        .prompt()?;

    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(None);
    }
    let number = answer
        .parse::<u64>()
        .map_err(|_| anyhow!("Número de registro inválido: {answer}"))?;
    Ok(Some(number))
}

pub struct App {
    service: Service,
}

impl App {
    pub fn new(service: Service) -> Self {
        App { service }
    }

    pub fn start(&mut self) -> Result<()> {
        println!("Bem-vindo ao cadastro.");
        self.enter_loop();
        self.service.save()?;
        Ok(())
    }
}

impl Menu for App {
    fn enter(&mut self) -> Result<MenuExit> {
        #[derive(EnumIter, Display)]
        enum Choice {
            #[display("Fazer cadastro")]
            Register,
            #[display("Área do administrador")]
            Admin,
            #[display("Sair")]
            Exit,
        }

        let choice = Select::new("O que deseja fazer?", Choice::iter().collect()).prompt()?;

        match choice {
            Choice::Register => {
                let Some(form) = prompt_valid_form(None)? else {
                    return Ok(MENU_LOOP);
                };
                let number = self.service.register(form)?.registration_number;
                self.service.save()?;
                println!("Cadastro realizado! Seu número de registro é {number}.");
                Ok(MENU_LOOP)
            }
            Choice::Admin => {
                if !self.service.has_admins() {
                    println!("Nenhum administrador cadastrado, crie o primeiro.");
                    let login = Text::new("Login:").prompt()?;
                    let password = Password::new("Senha:").prompt()?;
                    self.service.create_admin(&login, &password)?;
                    self.service.save()?;
                }

                let login = Text::new("Login:").prompt()?;
                let password = Password::new("Senha:")
                    .without_confirmation()
                    .with_display_mode(inquire::PasswordDisplayMode::Masked)
                    .prompt()?;
                self.service.login(&login, &password)?;

                AdminMenu {
                    service: &mut self.service,
                }
                .enter_loop();
                Ok(MENU_LOOP)
            }
            Choice::Exit => Ok(MENU_EXIT),
        }
    }
}

struct AdminMenu<'srv> {
    service: &'srv mut Service,
}

impl AdminMenu<'_> {
    fn pick_record(&self, message: &str) -> Result<Option<RecordID>> {
        let records = self.service.list(SearchFilter::All, "")?;
        if records.is_empty() {
            println!("[*] Nenhum cadastro encontrado");
            return Ok(None);
        }
        Ok(Select::new(message, records)
            .prompt_skippable()?
            .map(|record| record.id))
    }
}

impl Menu for AdminMenu<'_> {
    fn enter(&mut self) -> Result<MenuExit> {
        #[derive(EnumIter, Display)]
        enum Choice {
            #[display("Listar cadastros")]
            List,
            #[display("Adicionar cadastro")]
            Add,
            #[display("Editar cadastro")]
            Edit,
            #[display("Excluir cadastro")]
            Delete,
            #[display("Novo administrador")]
            NewAdmin,
            #[display("Sair da conta")]
            Logout,
        }

        let Some(admin) = self.service.current_admin() else {
            println!("[!] Sessão expirada, faça login novamente");
            return Ok(MENU_EXIT);
        };
        let message = format!("Logado como {admin}. O que deseja fazer?");

        let choice = Select::new(&message, Choice::iter().collect()).prompt()?;
        match choice {
            Choice::List => {
                let filter =
                    Select::new("Buscar por:", SearchFilter::iter().collect()).prompt()?;
                let term = Text::new("Termo de busca:").prompt()?;

                let records = self.service.list(filter, term.trim())?;
                println!("Total: {}", records.len());
                for record in records {
                    println!(
                        "{}\n  Email: {}\n  Celular: {}",
                        record, record.email, record.phone
                    );
                }
            }

            Choice::Add => {
                if let Some(form) = prompt_valid_form(None)? {
                    let number = prompt_registration_number(None)?;
                    let added = self.service.add(form, number)?;
                    println!("Cadastro #{} adicionado", added.registration_number);
                }
            }

            Choice::Edit => {
                let Some(id) = self.pick_record("Escolha o cadastro:")? else {
                    return Ok(MENU_LOOP);
                };
                let current = self
                    .service
                    .list(SearchFilter::All, "")?
                    .into_iter()
                    .find(|record| record.id == id)
                    .cloned()
                    .ok_or(anyhow!("Cadastro inexistente"))?;

                if let Some(form) = prompt_valid_form(Some(&current))? {
                    let number = prompt_registration_number(Some(current.registration_number))?
                        .unwrap_or(current.registration_number);
                    self.service.update(id, form, number)?;
                    println!("Cadastro atualizado");
                }
            }

            Choice::Delete => {
                let Some(id) = self.pick_record("Cadastro a excluir:")? else {
                    return Ok(MENU_LOOP);
                };
                if Confirm::new("Excluir este cadastro definitivamente?")
                    .with_default(false)
                    .prompt()?
                {
                    let removed = self.service.delete(id)?;
                    println!("Cadastro #{} excluído", removed.registration_number);
                }
            }

            Choice::NewAdmin => {
                let login = Text::new("Login do novo administrador:").prompt()?;
                let password = Password::new("Senha:").prompt()?;
                self.service.create_admin(&login, &password)?;
            }

            Choice::Logout => {
                self.service.logout();
                return Ok(MENU_EXIT);
            }
        };

        self.service.save()?;
        Ok(MENU_LOOP)
    }
}

fn main() -> Result<()> {
    let settings = Settings::from_env();
    simple_logging::log_to_file(&settings.log_path, log::LevelFilter::Info)?;

    let db = Database::open(settings.db_path)?;
    App::new(Service::new(db)).start()
}
