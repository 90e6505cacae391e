//! Trade-direction categories used to segment the output reports.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    ExportCaldera,
    ExportCoyol,
    ExportLimon,
    ImportCaldera,
    ImportLimon,
}

impl Category {
    /// Every category, in report emission order.
    pub const ALL: [Category; 5] = [
        Category::ExportCaldera,
        Category::ExportCoyol,
        Category::ExportLimon,
        Category::ImportCaldera,
        Category::ImportLimon,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::ExportCaldera => "TO Exportación Caldera",
            Category::ExportCoyol => "TO Exportación Coyol",
            Category::ExportLimon => "TO Exportación Limón",
            Category::ImportCaldera => "TO Importación Caldera",
            Category::ImportLimon => "TO Importación Limón",
        }
    }

    /// Label with spaces replaced by underscores, used as the output file stem.
    pub fn file_stem(self) -> String {
        self.label().replace(' ', "_")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
