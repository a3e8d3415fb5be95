pub mod clone;
pub mod diary;
pub mod memory;
pub mod user;

pub use clone::{CloneRecord, CloneResponse, CloneStatus, TrainingStage};
pub use diary::{Diary, DiaryResponse};
pub use memory::{CloneMemory, CreateMemoryRequest, MemoryType};
pub use user::{OnboardingAnswer, ProfileResponse, UpdateUserRequest, User};
