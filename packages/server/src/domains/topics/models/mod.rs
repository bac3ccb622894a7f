pub mod topic;
pub mod topic_search;

pub use topic::Topic;
pub use topic_search::TopicSearch;
