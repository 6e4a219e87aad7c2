//! Customer view/edit modal state.
//!
//! The modal is either closed, showing a customer read-only, or editing a
//! draft. Saving is split into [`CustomerEditor::begin_save`], which produces
//! the request to send, and [`CustomerEditor::complete_save`], which applies
//! the backend's answer. While a save is outstanding a second save is refused.
//! Every open or close starts a new modal generation; an answer for a save
//! begun under an older generation leaves the current modal alone.

use crate::api::CustomerPayload;
use crate::error::{OpsError, Result};
use crate::types::{Customer, CustomerStatus, Location, RecordId};

/// Editable form state. Text fields hold exactly what the user typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerDraft {
    pub id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub county: String,
    pub town: String,
    pub category: String,
    pub monthly_charge: String,
    pub status: String,
    pub location: Option<Location>,
}

impl CustomerDraft {
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            id: Some(customer.id.clone()),
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone().unwrap_or_default(),
            phone: customer.phone.clone(),
            gender: customer.gender.clone().unwrap_or_default(),
            county: customer.county.clone().unwrap_or_default(),
            town: customer.town.clone().unwrap_or_default(),
            category: customer.category.clone().unwrap_or_default(),
            monthly_charge: customer.monthly_charge.to_string(),
            status: customer.status.to_string(),
            location: customer.location,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Build the wire payload, coercing the monthly charge to a number.
    pub fn to_payload(&self) -> Result<CustomerPayload> {
        let charge = self.monthly_charge.trim();
        let monthly_charge = if charge.is_empty() {
            0.0
        } else {
            charge
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| OpsError::InvalidNumber(self.monthly_charge.clone()))?
        };

        let status = if self.status.trim().is_empty() {
            CustomerStatus::default()
        } else {
            self.status.parse()?
        };

        Ok(CustomerPayload {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: non_empty(&self.email),
            phone_number: self.phone.clone(),
            gender: non_empty(&self.gender),
            county: non_empty(&self.county),
            town: non_empty(&self.town),
            location: self.location,
            category: non_empty(&self.category),
            monthly_charge,
            status,
        })
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditorMode {
    #[default]
    Closed,
    Viewing(Customer),
    Editing(CustomerDraft),
}

/// The write to send
#[derive(Debug, Clone, PartialEq)]
pub enum SaveAction {
    Create(CustomerPayload),
    Update(RecordId, CustomerPayload),
}

/// A write the caller should send, tied to the modal it was started from
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    generation: u64,
    pub action: SaveAction,
}

impl SaveRequest {
    pub fn is_update(&self) -> bool {
        matches!(self.action, SaveAction::Update(..))
    }
}

#[derive(Debug)]
pub enum SaveOutcome {
    /// Modal closed; the collection should be refetched
    Saved { updated: bool },
    /// Modal still open with the draft intact
    Failed(OpsError),
    /// The modal was closed or reopened since the save began; it is left
    /// untouched. `saved` reports whether the write went through.
    Superseded { saved: bool },
}

#[derive(Debug, Clone, Default)]
pub struct CustomerEditor {
    mode: EditorMode,
    generation: u64,
    /// Generation of the outstanding save, if any
    saving: Option<u64>,
}

impl CustomerEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_view(&mut self, customer: Customer) {
        self.reset(EditorMode::Viewing(customer));
    }

    /// Open the form for `customer`, or a blank form when `None`.
    pub fn open_edit(&mut self, customer: Option<&Customer>) {
        let draft = customer
            .map(CustomerDraft::from_customer)
            .unwrap_or_default();
        self.reset(EditorMode::Editing(draft));
    }

    pub fn close(&mut self) {
        self.reset(EditorMode::Closed);
    }

    fn reset(&mut self, mode: EditorMode) {
        self.mode = mode;
        self.generation += 1;
        self.saving = None;
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != EditorMode::Closed
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_some()
    }

    pub fn draft(&self) -> Option<&CustomerDraft> {
        match &self.mode {
            EditorMode::Editing(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut CustomerDraft> {
        match &mut self.mode {
            EditorMode::Editing(draft) => Some(draft),
            _ => None,
        }
    }

    /// Attach a device location fix to the draft being edited.
    pub fn capture_location(&mut self, location: Location) {
        if let Some(draft) = self.draft_mut() {
            draft.location = Some(location);
        }
    }

    /// Label for the submit control
    pub fn submit_label(&self) -> Option<&'static str> {
        self.draft().map(|d| {
            if d.is_new() {
                "Create Customer"
            } else {
                "Update Customer"
            }
        })
    }

    /// Start saving the draft.
    ///
    /// Returns `Ok(None)` when nothing is being edited or a save is already
    /// outstanding, and an error when the draft cannot be encoded.
    pub fn begin_save(&mut self) -> Result<Option<SaveRequest>> {
        if self.saving.is_some() {
            return Ok(None);
        }
        let Some(draft) = self.draft() else {
            return Ok(None);
        };

        let payload = draft.to_payload()?;
        let action = match &draft.id {
            Some(id) => SaveAction::Update(id.clone(), payload),
            None => SaveAction::Create(payload),
        };
        self.saving = Some(self.generation);
        Ok(Some(SaveRequest {
            generation: self.generation,
            action,
        }))
    }

    pub fn complete_save(&mut self, request: &SaveRequest, result: Result<()>) -> SaveOutcome {
        if self.saving != Some(request.generation) {
            return SaveOutcome::Superseded {
                saved: result.is_ok(),
            };
        }
        self.saving = None;
        match result {
            Ok(()) => {
                self.mode = EditorMode::Closed;
                SaveOutcome::Saved {
                    updated: request.is_update(),
                }
            }
            Err(e) => SaveOutcome::Failed(e),
        }
    }
}
