//! Fixed category catalogs.
//!
//! Records reference categories by id string only; nothing enforces that
//! the id exists. Lookups of unknown ids resolve to the catalog's "other"
//! entry so views never fail on stale data.

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub label: &'static str,
}

/// Ordered list of categories plus the placeholder used for unknown ids.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    entries: &'static [Category],
    fallback: &'static Category,
}

impl Catalog {
    /// Entries in canonical display order.
    pub fn entries(&self) -> &'static [Category] {
        self.entries
    }

    pub fn fallback(&self) -> &'static Category {
        self.fallback
    }

    /// Exact lookup.
    pub fn get(&self, id: &str) -> Option<&'static Category> {
        self.entries.iter().find(|category| category.id == id)
    }

    /// Lookup that maps unknown ids to the fallback entry.
    pub fn resolve(&self, id: &str) -> &'static Category {
        self.get(id).unwrap_or(self.fallback)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

const fn category(id: &'static str, label: &'static str) -> Category {
    Category { id, label }
}

const EXPENSE_OTHER: Category = category("otros", "Otros");
const INCOME_OTHER: Category = category("otros_ing", "Otros");
const CONTENT_OTHER: Category = category("otro", "Otro");
const TASK_OTHER: Category = category("otro", "Otro");
const WEDDING_OTHER: Category = category("otro", "Otro");

const EXPENSE_ENTRIES: &[Category] = &[
    category("comida", "Comida"),
    category("transporte", "Transporte"),
    category("servicios", "Servicios"),
    category("entretenimiento", "Entretenimiento"),
    category("ropa", "Ropa"),
    category("salud", "Salud"),
    category("educacion", "Educación"),
    EXPENSE_OTHER,
];

const INCOME_ENTRIES: &[Category] = &[
    category("sueldo", "Sueldo"),
    category("freelance", "Freelance"),
    category("ventas", "Ventas"),
    INCOME_OTHER,
];

const CONTENT_ENTRIES: &[Category] = &[
    category("tutorial", "Tutorial"),
    category("trend", "Trend"),
    category("storytelling", "Storytelling"),
    category("humor", "Humor"),
    category("educativo", "Educativo"),
    category("bts", "Behind the scenes"),
    CONTENT_OTHER,
];

const TASK_ENTRIES: &[Category] = &[
    category("personal", "Personal"),
    category("trabajo", "Trabajo"),
    category("casa", "Casa"),
    category("salud", "Salud"),
    category("estudios", "Estudios"),
    category("compras", "Compras"),
    TASK_OTHER,
];

const WEDDING_ENTRIES: &[Category] = &[
    category("venue", "Venue"),
    category("catering", "Catering"),
    category("decoracion", "Decoración"),
    category("musica", "Música"),
    category("foto_video", "Fotos/Video"),
    category("vestimenta", "Vestimenta"),
    category("invitaciones", "Invitaciones"),
    WEDDING_OTHER,
];

pub const EXPENSE_CATEGORIES: Catalog = Catalog {
    entries: EXPENSE_ENTRIES,
    fallback: &EXPENSE_OTHER,
};

pub const INCOME_CATEGORIES: Catalog = Catalog {
    entries: INCOME_ENTRIES,
    fallback: &INCOME_OTHER,
};

pub const CONTENT_CATEGORIES: Catalog = Catalog {
    entries: CONTENT_ENTRIES,
    fallback: &CONTENT_OTHER,
};

pub const TASK_CATEGORIES: Catalog = Catalog {
    entries: TASK_ENTRIES,
    fallback: &TASK_OTHER,
};

pub const WEDDING_CATEGORIES: Catalog = Catalog {
    entries: WEDDING_ENTRIES,
    fallback: &WEDDING_OTHER,
};

#[cfg(test)]
mod tests {
    use super::{CONTENT_CATEGORIES, EXPENSE_CATEGORIES};

    #[test]
    fn resolve_maps_unknown_ids_to_fallback() {
        assert_eq!(EXPENSE_CATEGORIES.resolve("comida").label, "Comida");
        assert_eq!(EXPENSE_CATEGORIES.resolve("crypto").id, "otros");
        assert_eq!(CONTENT_CATEGORIES.resolve("").id, "otro");
    }

    #[test]
    fn fallback_is_part_of_the_catalog() {
        for catalog in [EXPENSE_CATEGORIES, CONTENT_CATEGORIES] {
            assert!(catalog.contains(catalog.fallback().id));
        }
    }
}
