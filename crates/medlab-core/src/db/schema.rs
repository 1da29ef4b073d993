//! SQLite schema definition.

/// Complete database schema for medlab.
///
/// References between collections (`patient_id`, `test_id`, `test_ids`) are
/// deliberately left unconstrained: records may point at ids that do not
/// exist (yet), and the aggregation layer resolves them at read time.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    age INTEGER NOT NULL,
    gender TEXT NOT NULL,
    phone TEXT,
    email TEXT,
    address TEXT,
    created_at TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);

-- ============================================================================
-- Test Catalog
-- ============================================================================

CREATE TABLE IF NOT EXISTS lab_tests (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    price TEXT NOT NULL,                         -- decimal string, 2 dp
    description TEXT
);

CREATE INDEX IF NOT EXISTS idx_lab_tests_category ON lab_tests(category);

-- ============================================================================
-- Reports
-- ============================================================================

CREATE TABLE IF NOT EXISTS reports (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL,
    test_id TEXT NOT NULL,
    date TEXT NOT NULL,
    results TEXT NOT NULL DEFAULT '[]',          -- JSON array of results
    notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_reports_patient ON reports(patient_id);

-- ============================================================================
-- Invoices
-- ============================================================================

CREATE TABLE IF NOT EXISTS invoices (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL,
    test_ids TEXT NOT NULL DEFAULT '[]',         -- JSON array of test ids
    total_amount TEXT NOT NULL,                  -- decimal string, 2 dp
    status TEXT NOT NULL DEFAULT 'Pending',
    payment_method TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_invoices_patient ON invoices(patient_id);
CREATE INDEX IF NOT EXISTS idx_invoices_status ON invoices(status);

-- ============================================================================
-- Hospital Profile (single row)
-- ============================================================================

CREATE TABLE IF NOT EXISTS hospital_details (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    details TEXT NOT NULL,                       -- JSON object
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
