pub struct Icons;

impl Icons {
    pub const BOX: &str = "📦";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const DATABASE: &str = "🗄️";
    pub const DEL: &str = "🗑️";
    pub const NEW: &str = "✨";
    pub const PERSON: &str = "👤";
    pub const PHONE: &str = "📱";
    pub const MAIL: &str = "✉️";
    pub const UP: &str = "⬆️";
    pub const DOWN: &str = "⬇️";
    pub const TAG: &str = "🏷️";
}
