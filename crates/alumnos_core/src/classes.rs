//! crates/alumnos_core/src/classes.rs
//!
//! Splits the class list into the classes a user teaches and the ones they attend.

use crate::domain::Class;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSplit {
    pub created: Vec<Class>,
    pub joined: Vec<Class>,
}

/// `created` holds classes whose creator is `email`; `joined` holds classes listing
/// `email` as a student that are not already in `created`.
pub fn split_classes(classes: Vec<Class>, email: &str) -> ClassSplit {
    let (created, rest): (Vec<Class>, Vec<Class>) =
        classes.into_iter().partition(|c| c.creator_email == email);

    let joined = rest
        .into_iter()
        .filter(|c| c.students.iter().any(|s| s.email == email))
        .filter(|c| !created.iter().any(|mine| mine.id == c.id))
        .collect();

    ClassSplit { created, joined }
}

impl ClassSplit {
    pub fn is_creator_of(&self, class_id: &str) -> bool {
        self.created.iter().any(|c| c.id == class_id)
    }
}
