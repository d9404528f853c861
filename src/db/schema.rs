//! SQL DDL for the tracking store.
//! SQLite-first; booleans are INTEGER 0/1.

/// Tables:
/// - `auth`: one identity row per email/phone, holds OTP, role and device token
/// - `parents`, `schools`, `buses`, `students`, `drivers`: profile rows
///
/// Relationship columns (`schoolid`, `parentid`, `morningbus`, ...) are indexed
/// but not declared as FOREIGN KEY; deletes never cascade.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS auth (
    userid INTEGER PRIMARY KEY AUTOINCREMENT,
    email_phone TEXT NOT NULL UNIQUE,
    otp TEXT NULL,
    verified INTEGER NOT NULL DEFAULT 0,
    role TEXT NOT NULL,
    token TEXT NULL,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS parents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NULL,
    email_mobile TEXT NOT NULL UNIQUE,
    address TEXT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS schools (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    schoolid TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    email_mobile TEXT NOT NULL UNIQUE,
    website TEXT NULL,
    address TEXT NULL,
    location TEXT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS buses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    busid TEXT NOT NULL UNIQUE,
    busno TEXT NOT NULL,
    schoolid TEXT NOT NULL,
    capacity INTEGER NULL,
    busdescription TEXT NULL
);

CREATE INDEX IF NOT EXISTS idx_buses_schoolid ON buses(schoolid);

CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id TEXT NOT NULL UNIQUE,
    parentid TEXT NULL,
    name TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    address TEXT NULL,
    home_coordinates TEXT NULL,
    school_id TEXT NOT NULL,
    school_name TEXT NULL,
    morning_pick TEXT NULL,
    morning_drop TEXT NULL,
    evening_pick TEXT NULL,
    evening_drop TEXT NULL,
    morningbus TEXT NULL,
    eveningbus TEXT NULL,
    photo TEXT NULL,
    verified INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_students_parentid ON students(parentid);
CREATE INDEX IF NOT EXISTS idx_students_school_id ON students(school_id);
CREATE INDEX IF NOT EXISTS idx_students_morningbus ON students(morningbus);
CREATE INDEX IF NOT EXISTS idx_students_eveningbus ON students(eveningbus);

CREATE TABLE IF NOT EXISTS drivers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    driver_id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    dl_number TEXT NOT NULL,
    dl_photo TEXT NOT NULL,
    email_phone TEXT NOT NULL UNIQUE,
    is_on_road INTEGER NOT NULL DEFAULT 0,
    morning_bus TEXT NULL,
    evening_bus TEXT NULL,
    current_location TEXT NULL,
    is_verified INTEGER NOT NULL DEFAULT 0,
    school_id TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_drivers_school_id ON drivers(school_id)
"#;
