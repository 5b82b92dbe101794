/// Data layer: table model, loading, filtering, and export.
///
/// Architecture:
/// ```text
///      raw CSV text
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  tolerant parse → Table (headers + normalized rows)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  session  │  raw Table + predicates → filtered row indices
///   └──────────┘
///        │  uses
///        ▼
///   ┌──────────┐      ┌──────────┐
///   │  filter   │ ───▶ │   date    │  DD/MM/YY comparison
///   └──────────┘      └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  row subset → CSV text / file
///   └──────────┘
/// ```
///
/// Nothing in here touches the UI; the viewer consumes the returned data.

pub mod date;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod session;
