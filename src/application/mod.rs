// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only:
//   - No burn code here (that's Layer 5)
//   - No HTTP or terminal I/O here (that's Layer 1)
//   - No file access here (that's Layer 6)

// Validate a partial input and predict its income label
pub mod predict_use_case;
