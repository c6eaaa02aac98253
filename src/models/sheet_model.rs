//! models/sheet_model.rs
//! Tabla leída de una hoja: cabecero (fila 1) + filas de texto.

use std::collections::HashMap;

use crate::error::GatewayError;

/// Mapa nombre de columna -> índice 0-based, construido desde la fila 1.
/// Los nombres se recortan y las columnas con cabecero vacío se descartan.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    sheet: String,
    width: usize,
    positions: HashMap<String, Vec<usize>>,
}

impl HeaderMap {
    pub fn from_header(sheet: &str, header: &[String]) -> Self {
        let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, raw) in header.iter().enumerate() {
            let name = raw.trim();
            if name.is_empty() {
                continue;
            }
            positions.entry(name.to_string()).or_default().push(idx);
        }
        HeaderMap {
            sheet: sheet.to_string(),
            width: header.len(),
            positions,
        }
    }

    /// Índice de una columna obligatoria. Falla nombrando la columna.
    pub fn require(&self, column: &str) -> Result<usize, GatewayError> {
        self.optional(column)?
            .ok_or_else(|| GatewayError::MissingColumn {
                sheet: self.sheet.clone(),
                column: column.to_string(),
            })
    }

    pub fn optional(&self, column: &str) -> Result<Option<usize>, GatewayError> {
        match self.positions.get(column).map(|v| v.as_slice()) {
            None | Some([]) => Ok(None),
            Some([idx]) => Ok(Some(*idx)),
            Some(_) => Err(GatewayError::DuplicateColumn {
                sheet: self.sheet.clone(),
                column: column.to_string(),
            }),
        }
    }

    /// Cantidad de columnas del cabecero original (incluye las vacías).
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }
}

#[derive(Debug, Clone, Default)]
pub struct SheetTable {
    pub header: HeaderMap,
    /// Filas de datos (sin el cabecero). `rows[0]` es la fila 2 de la hoja.
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn from_values(sheet: &str, mut values: Vec<Vec<String>>) -> Self {
        if values.is_empty() {
            return SheetTable {
                header: HeaderMap::from_header(sheet, &[]),
                rows: Vec::new(),
            };
        }
        let header_row = values.remove(0);
        SheetTable {
            header: HeaderMap::from_header(sheet, &header_row),
            rows: values,
        }
    }

    /// Valor de la celda; la API omite celdas vacías al final de la fila.
    pub fn cell(row: &[String], idx: usize) -> &str {
        row.get(idx).map(|s| s.as_str()).unwrap_or("")
    }

    pub fn opt_cell(row: &[String], idx: Option<usize>) -> &str {
        idx.map(|i| Self::cell(row, i)).unwrap_or("")
    }

    /// Número de fila en la hoja (1-based, contando el cabecero).
    pub fn sheet_row_number(data_index: usize) -> usize {
        data_index + 2
    }
}

/// Escritura de una celda (fila y columna 1-based, como en la hoja).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub row: usize,
    pub col: usize,
    pub value: String,
}

impl CellUpdate {
    pub fn new(row: usize, col: usize, value: impl Into<String>) -> Self {
        Self {
            row,
            col,
            value: value.into(),
        }
    }
}
