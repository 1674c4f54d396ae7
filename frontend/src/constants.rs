// Runtime configuration document fetched before anything else starts.
pub const ENV_CONFIG_URL: &str = "env.config.json";
pub const ENV_CONFIG_ALERT: &str = "Failed to fetch environment variables.";

// Version advertised to the host on `window.MF_VERSION`.
pub const MF_VERSION: &str = "0.0.1";

// DOM
pub const ROOT_ELEMENT_ID: &str = "root";
pub const TOAST_DURATION_MS: u32 = 4_000;

// Todos feature
pub const TODOS_REDUCER_NAME: &str = "todosSlice";
pub const DEMO_TODOS_PATH: &str = "assets/demoTodos.json";

// User-facing messages
pub const APP_READY_MESSAGE: &str = "Todos app is up and running!";
pub const CREATE_TODO_CLICKED_MESSAGE: &str = "Create a new todo was clicked!";
