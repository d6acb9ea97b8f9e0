//! Predefined type names from the C and C++ standard libraries and common
//! platforms.
//!
//! Each entry is ordinary declaration source, parsed in the newest language
//! it needs so that every entry is available whatever the current language.

use crate::lang::Lang;
use crate::parse;
use crate::typedefs::Typedefs;

/// `<stddef.h>`, `<stdint.h>` and friends. These must go first since later
/// entries refer to them.
const STDINT_H: &[&str] = &[
    "typedef          long   ptrdiff_t;",
    "typedef          long   ssize_t;",
    "typedef unsigned long   size_t;",
    "typedef          long   intmax_t;",
    "typedef          long   intptr_t;",
    "typedef unsigned long  uintmax_t;",
    "typedef unsigned long  uintptr_t;",
    "typedef   signed char   int8_t;",
    "typedef          short  int16_t;",
    "typedef          int    int32_t;",
    "typedef          long   int64_t;",
    "typedef unsigned char  uint8_t;",
    "typedef unsigned short uint16_t;",
    "typedef unsigned int   uint32_t;",
    "typedef unsigned long  uint64_t;",
    "typedef   signed char   int_fast8_t;",
    "typedef          short  int_fast16_t;",
    "typedef          int    int_fast32_t;",
    "typedef          long   int_fast64_t;",
    "typedef unsigned char  uint_fast8_t;",
    "typedef unsigned short uint_fast16_t;",
    "typedef unsigned int   uint_fast32_t;",
    "typedef unsigned long  uint_fast64_t;",
    "typedef   signed char   int_least8_t;",
    "typedef          short  int_least16_t;",
    "typedef          int    int_least32_t;",
    "typedef          long   int_least64_t;",
    "typedef unsigned char  uint_least8_t;",
    "typedef unsigned short uint_least16_t;",
    "typedef unsigned int   uint_least32_t;",
    "typedef unsigned long  uint_least64_t;",
    "typedef long double    max_align_t;",
    "typedef void          *nullptr_t;",
];

/// `<stdatomic.h>`.
const STDATOMIC_H: &[&str] = &[
    "typedef _Atomic          _Bool     atomic_bool;",
    "typedef _Atomic          char      atomic_char;",
    "typedef _Atomic   signed char      atomic_schar;",
    "typedef _Atomic          char8_t   atomic_char8_t;",
    "typedef _Atomic          char16_t  atomic_char16_t;",
    "typedef _Atomic          char32_t  atomic_char32_t;",
    "typedef _Atomic          wchar_t   atomic_wchar_t;",
    "typedef _Atomic          short     atomic_short;",
    "typedef _Atomic          int       atomic_int;",
    "typedef _Atomic          long      atomic_long;",
    "typedef _Atomic          long long atomic_llong;",
    "typedef _Atomic unsigned char      atomic_uchar;",
    "typedef _Atomic unsigned short     atomic_ushort;",
    "typedef _Atomic unsigned int       atomic_uint;",
    "typedef _Atomic unsigned long      atomic_ulong;",
    "typedef _Atomic unsigned long long atomic_ullong;",
    "typedef _Atomic  ptrdiff_t         atomic_ptrdiff_t;",
    "typedef _Atomic  size_t            atomic_size_t;",
    "typedef _Atomic  intmax_t          atomic_intmax_t;",
    "typedef _Atomic  intptr_t          atomic_intptr_t;",
    "typedef _Atomic uintptr_t          atomic_uintptr_t;",
    "typedef _Atomic uintmax_t          atomic_uintmax_t;",
    "typedef _Atomic  int_fast8_t       atomic_int_fast8_t;",
    "typedef _Atomic  int_fast16_t      atomic_int_fast16_t;",
    "typedef _Atomic  int_fast32_t      atomic_int_fast32_t;",
    "typedef _Atomic  int_fast64_t      atomic_int_fast64_t;",
    "typedef _Atomic uint_fast8_t       atomic_uint_fast8_t;",
    "typedef _Atomic uint_fast16_t      atomic_uint_fast16_t;",
    "typedef _Atomic uint_fast32_t      atomic_uint_fast32_t;",
    "typedef _Atomic uint_fast64_t      atomic_uint_fast64_t;",
    "typedef _Atomic  int_least8_t      atomic_int_least8_t;",
    "typedef _Atomic  int_least16_t     atomic_int_least16_t;",
    "typedef _Atomic  int_least32_t     atomic_int_least32_t;",
    "typedef _Atomic  int_least64_t     atomic_int_least64_t;",
    "typedef _Atomic uint_least8_t      atomic_uint_least8_t;",
    "typedef _Atomic uint_least16_t     atomic_uint_least16_t;",
    "typedef _Atomic uint_least32_t     atomic_uint_least32_t;",
    "typedef _Atomic uint_least64_t     atomic_uint_least64_t;",
];

/// The rest of the C standard library and POSIX.
const STD_C: &[&str] = &[
    // <signal.h>
    "typedef int sig_atomic_t;",
    // <stdarg.h>
    "typedef char *__builtin_va_list;",
    "typedef __builtin_va_list va_list;",
    // <setjmp.h>
    "typedef long jmp_buf[8];",
    // <stdio.h>
    "typedef struct _IO_FILE FILE;",
    "typedef long fpos_t;",
    // <time.h>
    "typedef long clock_t;",
    "typedef long time_t;",
    // <wchar.h>
    "typedef unsigned wint_t;",
    "typedef struct __mbstate_t mbstate_t;",
    // <sys/types.h>
    "typedef int pid_t;",
    "typedef long off_t;",
    "typedef unsigned mode_t;",
    "typedef unsigned uid_t;",
    "typedef unsigned gid_t;",
    "typedef unsigned long dev_t;",
    "typedef unsigned long ino_t;",
    // <pthread.h>
    "typedef unsigned long pthread_t;",
    "typedef struct __pthread_attr_s pthread_attr_t;",
    "typedef struct __pthread_barrier_s pthread_barrier_t;",
    "typedef struct __pthread_cond_s pthread_cond_t;",
    "typedef unsigned pthread_key_t;",
    "typedef struct __pthread_mutex_s pthread_mutex_t;",
    "typedef int pthread_once_t;",
    "typedef struct __pthread_rwlock_s pthread_rwlock_t;",
    "typedef volatile int pthread_spinlock_t;",
    // <threads.h>
    "typedef pthread_cond_t cnd_t;",
    "typedef pthread_mutex_t mtx_t;",
    "typedef pthread_once_t once_flag;",
    "typedef pthread_t thrd_t;",
    "typedef pthread_key_t tss_t;",
];

/// GNU C.
const GNU_C: &[&str] = &[
    "typedef float __m128[4];",
    "typedef double __m128d[2];",
    "typedef long long __m128i[2];",
    "typedef float __m256[8];",
    "typedef double __m256d[4];",
    "typedef long long __m256i[4];",
    "typedef float __m512[16];",
    "typedef double __m512d[8];",
    "typedef long long __m512i[8];",
];

/// Microsoft Windows.
const WIN32: &[&str] = &[
    "typedef int BOOL;",
    "typedef unsigned char BYTE;",
    "typedef BYTE BOOLEAN;",
    "typedef char CHAR;",
    "typedef unsigned long DWORD;",
    "typedef unsigned int DWORD32;",
    "typedef unsigned long long DWORD64;",
    "typedef float FLOAT;",
    "typedef void *HANDLE;",
    "typedef struct HINSTANCE__ *HINSTANCE;",
    "typedef long HRESULT;",
    "typedef struct HWND__ *HWND;",
    "typedef int INT;",
    "typedef long long LONG_PTR;",
    "typedef long LONG;",
    "typedef long long LONGLONG;",
    "typedef LONG_PTR LPARAM;",
    "typedef const char *LPCSTR;",
    "typedef const void *LPCVOID;",
    "typedef char *LPSTR;",
    "typedef void *LPVOID;",
    "typedef short SHORT;",
    "typedef unsigned long long ULONG_PTR;",
    "typedef ULONG_PTR SIZE_T;",
    "typedef unsigned int UINT;",
    "typedef unsigned long long UINT_PTR;",
    "typedef unsigned long ULONG;",
    "typedef unsigned long long ULONGLONG;",
    "typedef unsigned short USHORT;",
    "typedef wchar_t WCHAR;",
    "typedef unsigned short WORD;",
    "typedef UINT_PTR WPARAM;",
];

/// The C++ standard library.
const STD_CPP: &[&str] = &[
    "namespace std {
        typedef unsigned long size_t;
        typedef long ptrdiff_t;
        typedef long double max_align_t;
        typedef void *nullptr_t;
        enum class byte : unsigned char;
        enum class align_val_t : unsigned long;
    }",
    "namespace std {
        class bad_alloc;
        class bad_cast;
        class exception;
        class logic_error;
        class runtime_error;
        class type_info;
        class type_index;
        struct nothrow_t;
    }",
    "namespace std {
        class string;
        class wstring;
        class u8string;
        class u16string;
        class u32string;
        class string_view;
        class wstring_view;
        class u8string_view;
        class u16string_view;
        class u32string_view;
    }",
    "namespace std {
        class atomic_flag;
        class condition_variable;
        class jthread;
        class mutex;
        class recursive_mutex;
        class shared_mutex;
        class stop_token;
        class thread;
    }",
    "namespace std {
        class partial_ordering;
        class strong_ordering;
        class weak_ordering;
    }",
    "namespace std {
        class filebuf;
        class ios_base;
        class istream;
        class ostream;
        class iostream;
        class streambuf;
        class stringstream;
        class wistream;
        class wostream;
    }",
    "namespace std {
        typedef long streamoff;
        typedef long streamsize;
    }",
    "namespace std::chrono {
        class duration;
        class system_clock;
        class steady_clock;
    }",
];

/// Parse and register every predefined type name.
///
/// The entries are fixed, so a failure to parse one is a bug.
pub(super) fn load(typedefs: &mut Typedefs) {
    let groups = [
        (Lang::C_NEW, STDINT_H),
        (Lang::C_NEW, STDATOMIC_H),
        (Lang::C_NEW, STD_C),
        (Lang::C_NEW, GNU_C),
        (Lang::C_NEW, WIN32),
        (Lang::CPP_NEW, STD_CPP),
    ];
    for (lang, sources) in groups {
        for source in sources {
            match parse::typedef_decls(source, lang, typedefs) {
                Ok(asts) => {
                    for ast in asts {
                        typedefs.add(ast);
                    }
                }
                Err(error) => panic!("predefined type `{source}` failed to parse: {error:?}"),
            }
        }
    }
    tracing::debug!(count = typedefs.len(), "loaded predefined types");
}
