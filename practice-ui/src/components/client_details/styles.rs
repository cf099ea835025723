pub const PANEL_STYLE: &str = "background: #1f2937; border: 1px solid #374151; border-radius: 0.5rem; padding: 1rem; display: flex; flex-direction: column; gap: 1rem;";
pub const TAB_STYLE: &str = "background: none; border: none; border-bottom: 2px solid transparent; color: #9ca3af; padding: 0.5rem 0.75rem; cursor: pointer;";
pub const TAB_ACTIVE_STYLE: &str = "background: none; border: none; border-bottom: 2px solid #3b82f6; color: white; padding: 0.5rem 0.75rem; cursor: pointer;";
pub const SECTION_STYLE: &str =
    "display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 0.75rem;";
pub const LABEL_STYLE: &str =
    "display: flex; flex-direction: column; gap: 0.25rem; font-size: 0.8rem; color: #9ca3af;";
pub const INPUT_STYLE: &str = "background: #111827; color: white; border: 1px solid #374151; border-radius: 0.375rem; padding: 0.375rem 0.5rem; font-size: 0.9rem;";
pub const INPUT_LOCKED_STYLE: &str = "background: #1f2937; color: #6b7280; border: 1px dashed #4b5563; border-radius: 0.375rem; padding: 0.375rem 0.5rem; font-size: 0.9rem; cursor: not-allowed;";
pub const VALUE_STYLE: &str = "color: white; font-size: 0.9rem; min-height: 1.5rem;";
pub const PRIMARY_BUTTON_STYLE: &str = "background: #3b82f6; color: white; border: none; padding: 0.5rem 1rem; border-radius: 0.375rem; cursor: pointer;";
pub const SECONDARY_BUTTON_STYLE: &str = "background: #374151; color: white; border: none; padding: 0.5rem 1rem; border-radius: 0.375rem; cursor: pointer;";
pub const TAG_STYLE: &str = "display: inline-flex; align-items: center; gap: 0.25rem; font-size: 0.8rem; background: #374151; padding: 0.125rem 0.5rem; border-radius: 9999px;";
