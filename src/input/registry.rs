//! The set of registered bindings, kept in evaluation priority order

use crate::error::BindingError;
use crate::input::binding::{Binding, BindingId, Category, PressAction};
use crate::input::code::{codes_to_string, AbstractCode};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Rebind outcome handed to the persistence layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingChange {
    pub id: BindingId,
    pub codes: Vec<AbstractCode>,
    /// The new codes equal the binding's defaults
    pub is_default: bool,
}

/// Order-independent chord equality: equal length and every code of `a` in `b`.
pub fn codes_equivalent(a: &[AbstractCode], b: &[AbstractCode]) -> bool {
    a.len() == b.len() && a.iter().all(|code| b.contains(code))
}

pub struct BindingRegistry<A> {
    bindings: Vec<Binding<A>>,
    categories: Vec<Category>,
}

impl<A> Default for BindingRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> BindingRegistry<A> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Registers a binding and restores priority order.
    pub fn register(&mut self, binding: Binding<A>) -> Result<&mut Binding<A>, BindingError> {
        if self.exists(binding.id().as_str()) {
            return Err(BindingError::Duplicate(binding.id().to_string()));
        }
        if binding.codes().is_empty() {
            return Err(BindingError::EmptyCodes(binding.id().to_string()));
        }
        if let Some(category) = binding.category() {
            if self.category(category).is_none() {
                self.register_category(category);
            }
        }

        debug!(
            "Registered binding {} on {}",
            binding.id(),
            codes_to_string(binding.codes())
        );
        let id = binding.id().clone();
        self.bindings.push(binding);
        self.sort_by_priority();

        self.lookup_mut(id.as_str())
            .ok_or_else(|| BindingError::Unknown(id.to_string()))
    }

    /// Registers a category; its priority is its registration index.
    pub fn register_category(&mut self, name: &str) -> &Category {
        let index = match self
            .categories
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
        {
            Some(index) => index,
            None => {
                let priority = self.categories.len() as i32;
                self.categories.push(Category {
                    name: name.to_string(),
                    priority,
                });
                self.categories.len() - 1
            }
        };
        &self.categories[index]
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Categories in presentation order.
    pub fn categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.categories.iter().collect();
        categories.sort_by_key(|c| c.priority);
        categories
    }

    /// Bindings of one category, in evaluation order.
    pub fn bindings_in(&self, category: &str) -> impl Iterator<Item = &Binding<A>> + '_ {
        let category = category.to_string();
        self.bindings.iter().filter(move |b| {
            b.category()
                .is_some_and(|c| c.eq_ignore_ascii_case(&category))
        })
    }

    pub fn lookup(&self, id: &str) -> Option<&Binding<A>> {
        self.bindings.iter().find(|b| b.id().matches(id))
    }

    pub fn lookup_mut(&mut self, id: &str) -> Option<&mut Binding<A>> {
        self.bindings.iter_mut().find(|b| b.id().matches(id))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding<A>> {
        self.bindings.iter()
    }

    pub(crate) fn bindings_mut(&mut self) -> &mut [Binding<A>] {
        &mut self.bindings
    }

    /// Longer chords first; equal lengths keep their relative order.
    pub fn sort_by_priority(&mut self) {
        self.bindings
            .sort_by(|a, b| b.codes().len().cmp(&a.codes().len()));
    }

    pub fn add_action(&mut self, id: &str, action: Box<dyn PressAction<A>>) -> Result<(), BindingError> {
        let binding = self
            .lookup_mut(id)
            .ok_or_else(|| BindingError::Unknown(id.to_string()))?;
        binding.add_action(action);
        Ok(())
    }

    /// More than one binding sits on an equivalent chord.
    pub fn has_conflict_codes(&self, codes: &[AbstractCode]) -> bool {
        self.bindings
            .iter()
            .filter(|b| codes_equivalent(b.codes(), codes))
            .count()
            > 1
    }

    /// Like [`Self::has_conflict_codes`], restricted to bindings sharing
    /// `binding`'s availability predicate.
    pub fn has_conflict(&self, binding: &Binding<A>) -> bool {
        self.bindings
            .iter()
            .filter(|b| {
                codes_equivalent(b.codes(), binding.codes())
                    && b.availability().same_as(binding.availability())
            })
            .count()
            > 1
    }

    /// Moves a binding onto new codes.
    pub fn rebind(&mut self, id: &str, codes: Vec<AbstractCode>) -> Result<BindingChange, BindingError> {
        if codes.is_empty() {
            warn!("Rejected rebind of {} to an empty chord", id);
            return Err(BindingError::EmptyCodes(id.to_string()));
        }
        let binding = self
            .lookup_mut(id)
            .ok_or_else(|| BindingError::Unknown(id.to_string()))?;
        binding.set_codes(codes);
        binding.set_pressed(false);
        let change = BindingChange {
            id: binding.id().clone(),
            codes: binding.codes().to_vec(),
            is_default: binding.is_default(),
        };
        self.sort_by_priority();
        Ok(change)
    }

    /// Restores a binding's default codes.
    pub fn reset(&mut self, id: &str) -> Result<BindingChange, BindingError> {
        let defaults = self
            .lookup(id)
            .map(|b| b.default_codes().to_vec())
            .ok_or_else(|| BindingError::Unknown(id.to_string()))?;
        self.rebind(id, defaults)
    }

    /// Applies persisted chords; unknown identities and empty chords are skipped.
    pub fn load_bindings(&mut self, persisted: &BTreeMap<String, Vec<AbstractCode>>) -> usize {
        let mut applied = 0;
        for (id, codes) in persisted {
            let Some(binding) = self.lookup_mut(id) else {
                warn!("Ignoring persisted chord for unknown binding {}", id);
                continue;
            };
            if codes.is_empty() {
                warn!("Ignoring empty persisted chord for {}", id);
                continue;
            }
            binding.set_codes(codes.clone());
            applied += 1;
        }
        self.sort_by_priority();
        info!("Loaded {} persisted bindings", applied);
        applied
    }

    /// Chords that differ from their defaults, keyed by identity.
    pub fn export_bindings(&self) -> BTreeMap<String, Vec<AbstractCode>> {
        self.bindings
            .iter()
            .filter(|b| !b.is_default())
            .map(|b| (b.id().to_string(), b.codes().to_vec()))
            .collect()
    }
}
