use crate::classify::Topic;

/// Builds the classification prompt for a page
///
/// The reply is expected to be a single character: `h` when the content
/// relates to the topic, `u` when it does not.
pub fn build_prompt(topic: &Topic, content: &str) -> String {
    format!(
        "You are a content classifier reviewing website text for a filtering list.\n\
         \n\
         TOPIC:\n\
         {description}\n\
         \n\
         Decide whether the website content below relates to the topic. Consider \
         explicit mentions, implicit references and euphemisms, in English and in \
         Chinese (Simplified and Traditional).\n\
         \n\
         Reply with EXACTLY ONE character:\n\
         - \"h\" if the content IS related to the topic\n\
         - \"u\" if the content is NOT related to the topic\n\
         \n\
         WEBSITE CONTENT:\n\
         {content}\n",
        description = topic.description,
        content = content,
    )
}
