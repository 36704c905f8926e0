//! Form draft for creating or editing a user.

use std::any::Any;

use roster_states::{State, state_assign_impl};
use thiserror::Error;

use crate::BusinessConfig;
use crate::model::{NewUser, Region, User, UserId};

/// A violated form constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Aadhar number must be exactly {expected} characters (got {actual})")]
    AadharLength { expected: usize, actual: usize },
    #[error("Amount must be a whole number")]
    AmountNotNumber,
    #[error("Amount must be between {min} and {max}")]
    AmountOutOfRange { min: i32, max: i32 },
}

/// Not-yet-submitted user. `editing` is set when the draft was loaded from an
/// existing row; submitting it then updates that row instead of creating one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub phone_number: String,
    pub aadhar_number: String,
    pub region: Option<Region>,
    /// Raw text of the amount field.
    pub amount: String,
    pub editing: Option<UserId>,
    /// Errors of the last rejected submit.
    pub errors: Vec<DraftError>,
}

impl UserDraft {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            phone_number: user.phone_number.clone(),
            aadhar_number: user.aadhar_number.clone(),
            region: Some(user.region),
            amount: user.amount.to_string(),
            editing: Some(user.id),
            errors: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Checks every form constraint and reports all violations at once.
    pub fn validate(&self, config: &BusinessConfig) -> Result<NewUser, Vec<DraftError>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(DraftError::Required("Name"));
        }

        let phone_number = self.phone_number.trim();
        if phone_number.is_empty() {
            errors.push(DraftError::Required("Phone number"));
        }

        let aadhar_len = self.aadhar_number.chars().count();
        if aadhar_len == 0 {
            errors.push(DraftError::Required("Aadhar number"));
        } else if aadhar_len != config.aadhar_length {
            errors.push(DraftError::AadharLength {
                expected: config.aadhar_length,
                actual: aadhar_len,
            });
        }

        if self.region.is_none() {
            errors.push(DraftError::Required("Region"));
        }

        let amount = self.amount.trim();
        let parsed_amount = if amount.is_empty() {
            errors.push(DraftError::Required("Amount"));
            None
        } else {
            match amount.parse::<i32>() {
                Ok(value) if config.amount_range().contains(&value) => Some(value),
                Ok(_) => {
                    errors.push(DraftError::AmountOutOfRange {
                        min: config.amount_min,
                        max: config.amount_max,
                    });
                    None
                }
                Err(_) => {
                    errors.push(DraftError::AmountNotNumber);
                    None
                }
            }
        };

        match (self.region, parsed_amount) {
            (Some(region), Some(amount)) if errors.is_empty() => Ok(NewUser {
                name: name.to_owned(),
                phone_number: phone_number.to_owned(),
                aadhar_number: self.aadhar_number.clone(),
                region,
                amount,
            }),
            _ => Err(errors),
        }
    }
}

impl State for UserDraft {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}
