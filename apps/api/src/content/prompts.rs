// Prompt templates for the content generator. Placeholders in `{braces}` are
// substituted with `str::replace` before sending.

/// Deck prompt. Replace: {theme}
pub const DECK_PROMPT_TEMPLATE: &str = r#"Target Theme: "{theme}".
Task: Generate 6 "Collectible Cards" for a swipe deck centered around this theme.

Mix different types:
- "person": A fictional person who is deeply into this theme. Start the content with their first name followed by a comma.
- "quote": A famous or funny quote about this theme.
- "fact": A surprising fact about this theme.
- "joke": A joke about this theme.

Assign the "theme" field as "{theme}".
Assign a "rarity" ("common", "rare", "legendary") randomly.
Content should be engaging, short, and formatted for a mobile card.

Return a JSON ARRAY with this EXACT schema:
[
  {
    "id": "short-unique-id",
    "type": "person",
    "content": "Maya, codes by day and DJs by night",
    "subContent": "Optional tagline",
    "theme": "{theme}",
    "rarity": "common"
  }
]"#;

/// Profile prompt. Replace: {interests}, {edit_context}
pub const PROFILE_PROMPT_TEMPLATE: &str = r#"User Context/Interests: "{interests}"
{edit_context}

Task:
1. Generate/Update a creative anonymous public handle (nickname).
2. Write/Update a fun profile summary (2-3 sentences).
3. Write a "Looking For" statement (e.g. "Looking for hiking buddies" or "Seeking tech co-founders").
4. Write an "Offering" statement (e.g. "I offer great travel tips", "I can teach you Python").
5. Create 3 fictional user personas (connections) who match these interests.
6. Create 3 fictional community groups relevant to these interests.

Return a JSON object with this EXACT schema:
{
  "profile": {
    "name": "Pixel Pilgrim",
    "summary": "...",
    "aboutMe": "...",
    "lookingFor": "...",
    "offering": "...",
    "interests": ["..."]
  },
  "connections": [
    {"name": "...", "bio": "...", "sharedInterests": ["..."]}
  ],
  "groups": [
    {"name": "...", "description": "...", "posts": [{"author": "...", "content": "...", "timeAgo": "2h"}]}
  ]
}"#;

/// Line inserted for profile refinement. Replace: {edit}
pub const PROFILE_EDIT_LINE: &str = r#"Additional User Request/Edit: "{edit}""#;

/// Live chat opener prompt. Replace: {theme}, {match_karma}, {user_karma}
pub const LIVE_MATCH_PROMPT_TEMPLATE: &str = r#"Generate a short introductory message from a fictional user who is "Online" right now in a chat app.
Theme of the chat room: "{theme}".
The user's Karma level is {match_karma} (which is very close to the current user's level of {user_karma}).

Task:
1. Create a username.
2. Write a 1-sentence opening message related to {theme}.

Return a JSON object: {"name": "username", "message": "opening line"}"#;
