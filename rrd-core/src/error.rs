use std::fmt;

/// Failures that reject a whole upload. Nothing is stored when one of
/// these is returned.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    /// A structural problem reported by the CSV reader (e.g. a ragged row).
    Parse {
        line: Option<u64>,
        message: String,
    },
    /// The file had a header but no data rows.
    Empty,
    MissingColumns {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "Error al leer el archivo: {}", e),
            LoadError::Parse {
                line: Some(line),
                message,
            } => write!(f, "Error al procesar el archivo (linea {}): {}", line, message),
            LoadError::Parse { line: None, message } => {
                write!(f, "Error al procesar el archivo: {}", message)
            }
            LoadError::Empty => {
                write!(f, "El archivo esta vacio o no contiene datos validos")
            }
            LoadError::MissingColumns { expected, found } => write!(
                f,
                "El archivo CSV debe contener las columnas: {}\nColumnas encontradas: {}",
                expected.join(", "),
                found.join(", ")
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        LoadError::Parse {
            line: e.position().map(|p| p.line()),
            message: e.to_string(),
        }
    }
}
